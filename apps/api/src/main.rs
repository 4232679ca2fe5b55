mod config;
mod editor;
mod errors;
mod gateways;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateways::enhance::{LlmEnhancer, TemplateEnhancer, MODEL};
use crate::gateways::ingest::DocumentIngestor;
use crate::gateways::persist::JsonFilePersister;
use crate::gateways::EnhancementGateway;
use crate::routes::build_router;
use crate::sessions::SessionManager;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Editor API v{}", env!("CARGO_PKG_VERSION"));

    // Make sure the saves directory exists before the first persist
    tokio::fs::create_dir_all(&config.saves_dir).await?;

    let enhancer: Arc<dyn EnhancementGateway> = match config.anthropic_api_key.clone() {
        Some(key) => {
            info!("LLM enhancer initialized (model: {MODEL})");
            Arc::new(LlmEnhancer::new(key))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; using the template enhancer");
            Arc::new(TemplateEnhancer)
        }
    };

    let state = AppState {
        sessions: SessionManager::default(),
        enhancer,
        ingestor: Arc::new(DocumentIngestor),
        persister: Arc::new(JsonFilePersister::new(&config.saves_dir)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
