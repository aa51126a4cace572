//! Axum route handlers for the teacher (curricula) and student (roadmap) views.
//!
//! Store access and PDF rendering are synchronous; both run on the blocking
//! pool. Every store mutation is load → modify → save of the whole file.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::session::CurrentSession;
use crate::errors::AppError;
use crate::generation::generator::{
    generate_curriculum, generate_quiz, generate_roadmap, generate_rubric, CurriculumRequest,
    RoadmapRequest,
};
use crate::generation::options::{ensure_present, form_options, FormOptions};
use crate::models::curriculum::{curriculum_title, format_timestamp, CurriculumRecord};
use crate::models::roadmap::RoadmapDraft;
use crate::models::user::Role;
use crate::render::export_to_file;
use crate::state::AppState;
use crate::store::{find_record, find_record_mut, next_record_id, DocumentStore};

const CURRICULUM_PDF_NAME: &str = "Curriculum.pdf";
const ROADMAP_PDF_NAME: &str = "Learning_Roadmap.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateCurriculumRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RubricResponse {
    pub rubric: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/options
pub async fn handle_options() -> Json<FormOptions> {
    Json(form_options())
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task failed: {e}")))?
}

async fn load_record(store: &DocumentStore, id: u64) -> Result<CurriculumRecord, AppError> {
    let store = store.clone();
    run_blocking(move || {
        let records = store.load()?;
        find_record(&records, id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Curriculum {id} not found")))
    })
    .await
}

/// Applies `f` to record `id` and saves the whole collection.
async fn modify_record<F>(store: &DocumentStore, id: u64, f: F) -> Result<CurriculumRecord, AppError>
where
    F: FnOnce(&mut CurriculumRecord) + Send + 'static,
{
    let store = store.clone();
    run_blocking(move || {
        let mut records = store.load()?;
        let record = find_record_mut(&mut records, id)
            .ok_or_else(|| AppError::NotFound(format!("Curriculum {id} not found")))?;
        f(record);
        let updated = record.clone();
        store.save(&records)?;
        Ok(updated)
    })
    .await
}

async fn export_pdf(
    state: &AppState,
    title: String,
    body: String,
    rubric: Option<String>,
    filename: &str,
) -> Result<Response, AppError> {
    let path = state.config.pdf_output_path.clone();
    let bytes = run_blocking(move || {
        Ok(export_to_file(&path, &title, &body, rubric.as_deref())?)
    })
    .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, Bytes::from(bytes)).into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Teacher view
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/curricula
///
/// Generates a curriculum, appends it to the store, and selects it.
/// Nothing is written when generation fails.
pub async fn handle_create_curriculum(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(req): Json<CurriculumRequest>,
) -> Result<(StatusCode, Json<CurriculumRecord>), AppError> {
    session.require_role(Role::Teacher)?;
    req.validate()?;

    let content = generate_curriculum(state.llm.as_ref(), &req).await?;
    let title = curriculum_title(&req.subject, &req.level);
    let created_at = format_timestamp(&Local::now());

    let store = state.store.clone();
    let record = run_blocking(move || {
        let mut records = store.load()?;
        let record = CurriculumRecord::new(next_record_id(&records), title, content, created_at);
        records.push(record.clone());
        store.save(&records)?;
        Ok(record)
    })
    .await?;

    info!(id = record.id, title = %record.title, "Curriculum saved");
    state
        .sessions
        .update(session.token, |ctx| ctx.select(record.id))
        .await;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/curricula
pub async fn handle_list_curricula(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<CurriculumRecord>>, AppError> {
    session.require_role(Role::Teacher)?;
    let store = state.store.clone();
    let records = run_blocking(move || Ok(store.load()?)).await?;
    Ok(Json(records))
}

/// GET /api/v1/curricula/:id
///
/// Returns the record and makes it the session's selection.
pub async fn handle_get_curriculum(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<Json<CurriculumRecord>, AppError> {
    session.require_role(Role::Teacher)?;
    let record = load_record(&state.store, id).await?;
    state.sessions.update(session.token, |ctx| ctx.select(id)).await;
    Ok(Json(record))
}

/// POST /api/v1/curricula/:id/edit
pub async fn handle_enter_edit(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    session.require_role(Role::Teacher)?;
    load_record(&state.store, id).await?;
    state
        .sessions
        .update(session.token, |ctx| {
            ctx.select(id);
            ctx.edit_mode = true;
        })
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/curricula/:id/edit
///
/// Leaves edit mode without touching the stored record.
pub async fn handle_cancel_edit(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    session.require_role(Role::Teacher)?;
    state
        .sessions
        .update(session.token, |ctx| {
            if ctx.selected_record == Some(id) {
                ctx.edit_mode = false;
            }
        })
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/curricula/:id
///
/// Saves edited title and content. The record must be open for editing in
/// this session; saving leaves edit mode.
pub async fn handle_update_curriculum(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
    Json(req): Json<UpdateCurriculumRequest>,
) -> Result<Json<CurriculumRecord>, AppError> {
    session.require_role(Role::Teacher)?;
    if !session.context.is_editing(id) {
        return Err(AppError::Validation(format!(
            "Curriculum {id} is not open for editing"
        )));
    }
    ensure_present("title", &req.title)?;

    let record = modify_record(&state.store, id, move |record| {
        record.title = req.title;
        record.content = req.content;
    })
    .await?;

    info!(id, "Curriculum edited");
    state
        .sessions
        .update(session.token, |ctx| ctx.edit_mode = false)
        .await;
    Ok(Json(record))
}

/// POST /api/v1/curricula/:id/rubric
///
/// Regenerates the rubric from the stored content and overwrites the old one.
pub async fn handle_curriculum_rubric(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<Json<CurriculumRecord>, AppError> {
    session.require_role(Role::Teacher)?;
    let current = load_record(&state.store, id).await?;
    let rubric = generate_rubric(state.llm.as_ref(), &current.content).await?;

    let record = modify_record(&state.store, id, move |record| record.rubric = Some(rubric)).await?;
    state.sessions.update(session.token, |ctx| ctx.select(id)).await;
    Ok(Json(record))
}

/// POST /api/v1/curricula/:id/quiz
///
/// Regenerates the quiz from the stored content and overwrites the old one.
pub async fn handle_curriculum_quiz(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<Json<CurriculumRecord>, AppError> {
    session.require_role(Role::Teacher)?;
    let current = load_record(&state.store, id).await?;
    let quiz = generate_quiz(state.llm.as_ref(), &current.content).await?;

    let record = modify_record(&state.store, id, move |record| record.quiz = Some(quiz)).await?;
    state.sessions.update(session.token, |ctx| ctx.select(id)).await;
    Ok(Json(record))
}

/// GET /api/v1/curricula/:id/pdf
///
/// Renders the stored title, content and rubric. The export file is
/// overwritten and the same bytes are returned for download.
pub async fn handle_curriculum_pdf(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    session.require_role(Role::Teacher)?;
    let record = load_record(&state.store, id).await?;
    export_pdf(
        &state,
        record.title,
        record.content,
        record.rubric,
        CURRICULUM_PDF_NAME,
    )
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Student view
// ────────────────────────────────────────────────────────────────────────────

fn current_roadmap(session: &CurrentSession) -> Result<RoadmapDraft, AppError> {
    session
        .context
        .roadmap
        .clone()
        .ok_or_else(|| AppError::NotFound("No roadmap generated yet".to_string()))
}

/// POST /api/v1/roadmap
///
/// Generates a roadmap and replaces the session's draft. Never persisted.
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(req): Json<RoadmapRequest>,
) -> Result<Json<RoadmapDraft>, AppError> {
    session.require_role(Role::Student)?;
    req.validate()?;

    let draft = generate_roadmap(state.llm.as_ref(), req).await?;
    let stored = draft.clone();
    state
        .sessions
        .update(session.token, move |ctx| ctx.roadmap = Some(stored))
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(draft))
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(session: CurrentSession) -> Result<Json<RoadmapDraft>, AppError> {
    session.require_role(Role::Student)?;
    Ok(Json(current_roadmap(&session)?))
}

/// POST /api/v1/roadmap/rubric
///
/// Returns a rubric for the current draft. The rubric is not kept anywhere.
pub async fn handle_roadmap_rubric(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<RubricResponse>, AppError> {
    session.require_role(Role::Student)?;
    let draft = current_roadmap(&session)?;
    let rubric = generate_rubric(state.llm.as_ref(), &draft.content).await?;
    Ok(Json(RubricResponse { rubric }))
}

/// GET /api/v1/roadmap/pdf
pub async fn handle_roadmap_pdf(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, AppError> {
    session.require_role(Role::Student)?;
    let draft = current_roadmap(&session)?;
    export_pdf(
        &state,
        draft.export_title(),
        draft.content,
        None,
        ROADMAP_PDF_NAME,
    )
    .await
}
