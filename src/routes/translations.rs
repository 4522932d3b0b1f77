use axum::{
    extract::{Path, Query, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::AppState;
use crate::i18n::Localization;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub supported: Vec<String>,
    pub default_language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub language_code: String,
    pub key: String,
    pub value: String,
}

/// GET /languages
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        supported: state
            .translations
            .supported()
            .into_iter()
            .map(str::to_string)
            .collect(),
        default_language: state.translations.negotiate(None, None).language_code.clone(),
    })
}

/// GET /translations?lang=
///
/// Falls back to `Accept-Language`, then the configured default.
pub async fn negotiated_dictionary(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(query): Query<LanguageQuery>,
) -> Json<Localization> {
    let accept = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let table = state.translations.negotiate(query.lang.as_deref(), accept);
    Json((*table).clone())
}

/// GET /translations/:lang
pub async fn dictionary(
    Path(lang): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Localization> {
    Json((*state.translations.get(&lang)).clone())
}

/// GET /translations/:lang/:key
pub async fn translate_key(
    Path((lang, key)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Json<TranslationResponse> {
    let table = state.translations.get(&lang);
    let value = table.t(&key).to_string();

    Json(TranslationResponse {
        language_code: table.language_code.clone(),
        key,
        value,
    })
}
