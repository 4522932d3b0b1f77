pub mod health;
pub mod schemes;
pub mod sessions;
pub mod translations;

use axum::{routing::delete, routing::get, routing::post, routing::put, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Scheme browser
        .route("/schemes", get(schemes::list_schemes))
        .route("/schemes/detail", get(schemes::get_scheme_detail))
        // Selection sessions
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:session_id", delete(sessions::delete_session))
        .route(
            "/sessions/:session_id/selection",
            put(sessions::select_scheme)
                .get(sessions::get_selection)
                .delete(sessions::clear_selection),
        )
        // Localization
        .route("/languages", get(translations::list_languages))
        .route("/translations", get(translations::negotiated_dictionary))
        .route("/translations/:lang", get(translations::dictionary))
        .route("/translations/:lang/:key", get(translations::translate_key))
}
