use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::db::NoteStore;
use crate::envelope::{Envelope, Errcode};
use crate::errors::{ApiException, ServiceError, ValidationDetail};
use crate::models::{CreateNote, Note, UpdateNote};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn NoteStore>,
    pub pagination: PaginationConfig,
    pub instance_id: String,
}

/// List query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Results per page
    pub page_size: Option<i64>,
}

/// Health check endpoint
///
/// Returns a bare body on purpose: the response normalizer wraps it, which
/// keeps even infrastructure endpoints on the standard envelope.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "envelope-api",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Create a note
#[utoipa::path(
    post,
    path = "/notes",
    tag = "notes",
    request_body = CreateNote,
    responses(
        (status = 200, description = "Enveloped note or failure code", body = serde_json::Value)
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNote>, JsonRejection>,
) -> Result<Json<Note>, ServiceError> {
    let Json(payload) = payload.map_err(|rejection| {
        ServiceError::validation(
            Errcode::InvalidRequest.label(),
            ValidationDetail::Text(rejection.body_text()),
        )
    })?;

    let title = match payload.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            return Err(ApiException::new(Errcode::MissingParams)
                .msg("Missing required parameter: title")
                .into())
        }
    };

    info!("Create note request: title='{}'", title);
    let note = state.store.create(title, payload.body).await?;

    // Bare body: the normalizer wraps it with the mutating-method code.
    Ok(Json(note))
}

/// List notes with pagination
#[utoipa::path(
    get,
    path = "/notes",
    tag = "notes",
    params(ListParams),
    responses(
        (status = 200, description = "Enveloped page of notes", body = serde_json::Value)
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope, ServiceError> {
    let page = params.page.unwrap_or(1);
    let page_size = params
        .page_size
        .unwrap_or(state.pagination.default_page_size)
        .min(state.pagination.max_page_size);

    if page < 1 || page_size < 1 {
        return Err(ApiException::new(Errcode::InvalidParams)
            .context(json!({"page": "must be at least 1", "page_size": "must be at least 1"}))
            .into());
    }

    info!("List notes request: page={}, page_size={}", page, page_size);

    // Well-formed requests can still carry an absurd page number; the
    // offset must not overflow on the way to the store.
    let offset = match (page - 1).checked_mul(page_size) {
        Some(offset) => offset,
        None => {
            return Err(ApiException::new(Errcode::InvalidParams)
                .context(json!({"page": "is out of range"}))
                .into())
        }
    };
    let (notes, total) = state.store.list(offset, page_size).await?;
    let pages = if total == 0 { 0 } else { (total + page_size - 1) / page_size };

    let page_url =
        |p: i64| Value::String(format!("/notes?page={}&page_size={}", p, page_size));
    let prev = if page > 1 { page_url(page - 1) } else { Value::Null };
    let next = if page < pages { page_url(page + 1) } else { Value::Null };

    let envelope = Envelope::of(Errcode::Done)
        .data(json!(notes))
        .field("prev", prev)
        .field("next", next)
        .field("pages", json!(pages))
        .build()?;

    Ok(envelope)
}

/// Retrieve a note by id
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Enveloped note or resource-not-found code", body = serde_json::Value)
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Envelope, ServiceError> {
    info!("Get note request: id={}", id);

    match state.store.retrieve(id).await? {
        Some(note) => Ok(Envelope::done(json!(note))),
        None => Err(ApiException::new(Errcode::ResourceNotFound).into()),
    }
}

/// Update a note
#[utoipa::path(
    patch,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = UpdateNote,
    responses(
        (status = 200, description = "Enveloped updated note", body = serde_json::Value)
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateNote>, JsonRejection>,
) -> Result<Json<Note>, ServiceError> {
    let Json(patch) = payload.map_err(|rejection| {
        ServiceError::validation(
            Errcode::InvalidRequest.label(),
            ValidationDetail::Text(rejection.body_text()),
        )
    })?;

    info!("Update note request: id={}", id);

    match state.store.update(id, patch).await? {
        Some(note) => Ok(Json(note)),
        None => Err(ApiException::new(Errcode::ResourceNotFound).into()),
    }
}

/// Soft-delete a note
///
/// Marks the record deleted and persists the mark; the row itself stays.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note marked deleted"),
        (status = 200, description = "Resource-not-found envelope", body = serde_json::Value)
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    info!("Soft delete note request: id={}", id);

    if state.store.soft_delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiException::new(Errcode::ResourceNotFound).into())
    }
}
