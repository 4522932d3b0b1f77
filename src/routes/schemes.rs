//! Scheme browser endpoints
//!
//! The list endpoint always answers 200: when the provider fails it serves
//! the fallback record and reports the failure next to it so the app can
//! show its retry banner.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{category_counts, filter_by_category, CategoryCount, SchemeSummary};
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestIdExt;

#[derive(Debug, Deserialize)]
pub struct ListSchemesQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchFailure {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeListResponse {
    pub schemes: Vec<SchemeSummary>,
    /// Counts over the whole list, before any category filter.
    pub categories: Vec<CategoryCount>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub title: Option<String>,
}

/// GET /schemes
pub async fn list_schemes(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSchemesQuery>,
) -> Json<SchemeListResponse> {
    tracing::debug!(
        request_id = ?headers.request_id(),
        category = ?query.category,
        "Listing schemes"
    );

    let outcome = state.schemes.fetch_summaries().await;
    let fallback = outcome.is_fallback();
    let categories = category_counts(&outcome.schemes);
    let error = outcome.error.map(|e| FetchFailure {
        code: e.code().to_string(),
        message: e.to_string(),
    });

    Json(SchemeListResponse {
        schemes: filter_by_category(outcome.schemes, query.category.as_deref()),
        categories,
        fallback,
        error,
        fetched_at: Utc::now(),
    })
}

/// GET /schemes/detail?title=
///
/// No fallback: failures come back as an error body the detail view shows inline.
pub async fn get_scheme_detail(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<impl IntoResponse> {
    let title = query
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;

    tracing::debug!(request_id = ?headers.request_id(), title, "Fetching scheme detail");

    let detail = state.schemes.fetch_detail(title).await?;
    Ok(DataResponse::new(detail))
}
