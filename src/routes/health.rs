use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: ProviderInfo,
    pub languages: usize,
    pub active_sessions: usize,
}

#[derive(Serialize)]
pub struct ProviderInfo {
    pub model: String,
    pub timeout_seconds: u64,
}

/// Health check endpoint
///
/// Never calls the provider.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: ProviderInfo {
            model: state.settings.gemini_model.clone(),
            timeout_seconds: state.settings.gemini_timeout_seconds,
        },
        languages: state.translations.supported().len(),
        active_sessions: state.sessions.len(),
    })
}
