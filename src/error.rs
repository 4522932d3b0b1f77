//! Error types
//!
//! `FetchError` covers a single structured-content fetch. `ApiError` is what
//! route handlers return and renders as a consistent JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure of one provider round-trip plus extraction.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Generative API unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Generative API error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Generative API returned an unreadable envelope: {0}")]
    Envelope(#[source] reqwest::Error),

    #[error("Invalid response format: no JSON object found")]
    NoJsonFound,

    #[error("Invalid response format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request was superseded")]
    Cancelled,
}

impl FetchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Envelope(_) => "ENVELOPE_ERROR",
            Self::NoJsonFound => "NO_JSON_FOUND",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] FetchError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(FetchError::Cancelled) => StatusCode::CONFLICT,
            Self::Upstream(FetchError::Transport(e)) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Upstream(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Upstream(e) => format!("{}. Please try again.", e),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            Self::Upstream(e) => {
                tracing::warn!(error = %e, code = e.code(), "Structured fetch failed");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            request_id: None, // Filled in by handlers that have one
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
