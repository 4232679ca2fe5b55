use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::editor::{
    EditorSession, EnhanceRejected, Notification, SaveOutcome, SectionId, Sections, SessionPhase,
};
use crate::errors::AppError;
use crate::gateways::EnhancementGateway;
use crate::state::AppState;

/// Snapshot of a session as the client sees it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub sections: Sections,
    pub active_section: SectionId,
    pub draft: String,
    pub phase: SessionPhase,
    pub dirty: bool,
    pub enhancing: bool,
    pub word_count: usize,
    pub notification: Option<Notification>,
}

impl SessionView {
    fn of(session: &mut EditorSession) -> Self {
        SessionView {
            sections: session.document().clone(),
            active_section: session.active_section(),
            draft: session.draft_text().to_owned(),
            phase: session.phase(),
            dirty: session.is_dirty(),
            enhancing: session.is_enhancing(),
            word_count: session.word_count(),
            notification: session.notification().cloned(),
        }
    }
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: SessionView,
}

#[derive(Deserialize)]
pub struct EditDraftRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct SwitchSectionRequest {
    pub section: SectionId,
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    #[serde(flatten)]
    pub view: SessionView,
}

#[derive(Serialize)]
pub struct PersistResponse {
    pub filename: String,
}

async fn fetch_session(
    state: &AppState,
    id: Uuid,
) -> Result<Arc<Mutex<EditorSession>>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let (id, session) = state.sessions.create().await;
    let view = SessionView::of(&mut *session.lock().await);
    Json(CreateSessionResponse {
        session_id: id,
        view,
    })
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;
    let mut session = session.lock().await;
    Ok(Json(SessionView::of(&mut session)))
}

/// POST /api/v1/sessions/:id/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .ok_or_else(|| AppError::Validation("uploaded file has no filename".to_string()))?
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            upload = Some((filename, bytes));
            break;
        }
    }
    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    // The gateway call runs without the session lock; the document is
    // only touched once the result is known.
    match state.ingestor.ingest(&filename, &bytes).await {
        Ok(sections) => {
            let mut session = session.lock().await;
            session.apply_ingest(sections);
            Ok(Json(SessionView::of(&mut session)))
        }
        Err(e) => {
            session.lock().await.ingest_failed(&e.to_string());
            Err(e.into())
        }
    }
}

/// PUT /api/v1/sessions/:id/draft
pub async fn handle_edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditDraftRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;
    let mut session = session.lock().await;
    session.edit_active_section(req.text);
    Ok(Json(SessionView::of(&mut session)))
}

/// POST /api/v1/sessions/:id/draft/discard
pub async fn handle_discard_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;
    let mut session = session.lock().await;
    session.discard_draft();
    Ok(Json(SessionView::of(&mut session)))
}

/// POST /api/v1/sessions/:id/active
pub async fn handle_switch_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SwitchSectionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;
    let mut session = session.lock().await;
    session.switch_active_section(req.section);
    Ok(Json(SessionView::of(&mut session)))
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveResponse>, AppError> {
    let session = fetch_session(&state, id).await?;
    let mut session = session.lock().await;
    let saved = session.save_active_section() == SaveOutcome::Saved;
    Ok(Json(SaveResponse {
        saved,
        view: SessionView::of(&mut session),
    }))
}

/// Drives one enhancement call end to end: capture the ticket under the
/// session lock, await the gateway with the lock released, then resolve
/// the ticket. The in-flight flag is cleared on both paths.
pub(crate) async fn run_enhancement(
    session: Arc<Mutex<EditorSession>>,
    enhancer: Arc<dyn EnhancementGateway>,
) -> Result<(), AppError> {
    let ticket = {
        let mut session = session.lock().await;
        session.begin_enhance().map_err(|rejected| match rejected {
            EnhanceRejected::InFlight => AppError::Conflict(
                "an enhancement is already in flight for this session".to_string(),
            ),
            EnhanceRejected::NothingToEnhance => AppError::UnprocessableEntity(
                "nothing to enhance: the draft matches the committed value".to_string(),
            ),
        })?
    };

    let result = enhancer.enhance(ticket.section, &ticket.text).await;

    let mut session = session.lock().await;
    match result {
        Ok(text) => {
            session.complete_enhance(ticket, text);
            Ok(())
        }
        Err(e) => {
            session.fail_enhance(ticket, &e.to_string());
            Err(AppError::Enhance(e))
        }
    }
}

/// POST /api/v1/sessions/:id/enhance
pub async fn handle_enhance_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = fetch_session(&state, id).await?;
    run_enhancement(session.clone(), state.enhancer.clone()).await?;
    let mut session = session.lock().await;
    Ok(Json(SessionView::of(&mut session)))
}

/// POST /api/v1/sessions/:id/persist
pub async fn handle_persist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersistResponse>, AppError> {
    let session = fetch_session(&state, id).await?;
    // Committed values only: an unsaved draft is not persisted.
    let sections = session.lock().await.document().clone();

    match state.persister.persist(&sections).await {
        Ok(ack) => {
            session.lock().await.persist_succeeded(&ack.filename);
            Ok(Json(PersistResponse {
                filename: ack.filename,
            }))
        }
        Err(e) => {
            session.lock().await.persist_failed(&e.to_string());
            Err(e.into())
        }
    }
}

/// GET /api/v1/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = fetch_session(&state, id).await?;
    let exported = session.lock().await.export_document();
    let body = serde_json::to_string_pretty(&exported).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.json\"",
            ),
        ],
        body,
    ))
}
