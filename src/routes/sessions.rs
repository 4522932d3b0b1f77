//! Selection sessions
//!
//! A session tracks which scheme an app screen has open. Re-selecting
//! while a detail fetch is pending cancels the older fetch.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse, NoContent};
use crate::app::AppState;
use crate::domain::SchemeSummary;
use crate::error::{ApiError, ApiResult};
use crate::services::selection::DetailSelector;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: Uuid,
}

fn selector(state: &AppState, session_id: &Uuid) -> ApiResult<DetailSelector> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", session_id)))
}

/// POST /sessions
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = state.sessions.create();
    Created(SessionCreated { session_id })
}

/// DELETE /sessions/:session_id
pub async fn delete_session(
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<NoContent> {
    if state.sessions.remove(&session_id) {
        Ok(NoContent)
    } else {
        Err(ApiError::NotFound(format!("Session {} not found", session_id)))
    }
}

/// PUT /sessions/:session_id/selection
///
/// Body is the summary the user tapped. Responds with the enriched record.
pub async fn select_scheme(
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(summary): Json<SchemeSummary>,
) -> ApiResult<impl IntoResponse> {
    if summary.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let enriched = selector(&state, &session_id)?.select(summary).await?;
    Ok(DataResponse::new(enriched))
}

/// GET /sessions/:session_id/selection
pub async fn get_selection(
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let current = selector(&state, &session_id)?.current();
    Ok(DataResponse::new(current))
}

/// DELETE /sessions/:session_id/selection
pub async fn clear_selection(
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<NoContent> {
    selector(&state, &session_id)?.clear();
    Ok(NoContent)
}
