pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::sessions::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route("/api/v1/sessions/:id/upload", post(handlers::handle_upload))
        .route("/api/v1/sessions/:id/draft", put(handlers::handle_edit_draft))
        .route(
            "/api/v1/sessions/:id/draft/discard",
            post(handlers::handle_discard_draft),
        )
        .route(
            "/api/v1/sessions/:id/active",
            post(handlers::handle_switch_section),
        )
        .route(
            "/api/v1/sessions/:id/save",
            post(handlers::handle_save_section),
        )
        .route(
            "/api/v1/sessions/:id/enhance",
            post(handlers::handle_enhance_section),
        )
        .route(
            "/api/v1/sessions/:id/persist",
            post(handlers::handle_persist),
        )
        .route(
            "/api/v1/sessions/:id/export",
            get(handlers::handle_export),
        )
        .with_state(state)
}
