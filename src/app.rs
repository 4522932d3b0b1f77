use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::i18n::Translations;
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::{SchemeService, SelectionSessions};

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub schemes: SchemeService,
    pub sessions: SelectionSessions,
    pub translations: Translations,
}

impl AppState {
    pub fn new(
        settings: Settings,
        schemes: SchemeService,
        translations: Translations,
    ) -> Arc<Self> {
        let sessions = SelectionSessions::new(schemes.clone(), settings.session_limits());

        Arc::new(Self {
            settings,
            schemes,
            sessions,
            translations,
        })
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::ACCEPT_LANGUAGE,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .max_age(max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::services::gemini_client::tests::{envelope, GENERATE_PATH};
    use crate::services::schemes::tests::service_for;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use url::Url;

    fn app_for(server: &mockito::ServerGuard) -> Router {
        let settings = Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            log_format: crate::logging::LogFormat::Pretty,
            cors_allow_origins: vec!["http://localhost:5173".to_string()],
            gemini_api_url: Url::parse(&server.url()).unwrap(),
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_api_key_var: "GEMINI_API_KEY".to_string(),
            gemini_timeout_seconds: 5,
            default_language: "en".to_string(),
            session_idle_seconds: 1800,
            max_sessions: 100,
        };
        let translations = Translations::load_bundled(&settings.default_language).unwrap();
        create_app(AppState::new(settings, service_for(server), translations))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn scheme_list_reports_fallback_with_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(500)
            .create_async()
            .await;
        let app = app_for(&server);

        let (status, body) = send(&app, Method::GET, "/schemes", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], true);
        assert_eq!(body["error"]["code"], "HTTP_ERROR");
        assert_eq!(body["schemes"].as_array().unwrap().len(), 1);
        assert_eq!(body["schemes"][0]["title"], "PM-KISAN");
    }

    #[tokio::test]
    async fn scheme_list_filters_but_counts_everything() {
        let mut server = mockito::Server::new_async().await;
        let reply = json!({ "schemes": [
            { "title": "PM-KISAN", "category": "finance" },
            { "title": "PMFBY", "category": "insurance" },
            { "title": "KCC", "category": "finance" }
        ]})
        .to_string();
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(envelope(&reply))
            .create_async()
            .await;
        let app = app_for(&server);

        let (status, body) = send(&app, Method::GET, "/schemes?category=finance", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], false);
        assert!(body.get("error").is_none());
        assert_eq!(body["schemes"].as_array().unwrap().len(), 2);
        assert_eq!(body["categories"][0]["count"], 3);
    }

    #[tokio::test]
    async fn detail_failure_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(envelope("No structured data today."))
            .create_async()
            .await;
        let app = app_for(&server);

        let (status, body) = send(&app, Method::GET, "/schemes/detail?title=PMFBY", None).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "NO_JSON_FOUND");
    }

    #[tokio::test]
    async fn detail_requires_title() {
        let server = mockito::Server::new_async().await;
        let app = app_for(&server);

        let (status, _) = send(&app, Method::GET, "/schemes/detail?title=%20", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_selection_lifecycle() {
        let mut server = mockito::Server::new_async().await;
        let reply = json!({
            "title": "PM-KISAN",
            "detailedDescription": "Income support",
            "eligibility": "Landholding farmers",
            "requiredDocuments": ["Aadhaar Card", "Land Records"],
            "lastDate": "Ongoing",
            "contactInfo": "155261"
        })
        .to_string();
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(envelope(&reply))
            .create_async()
            .await;
        let app = app_for(&server);

        let (status, created) = send(&app, Method::POST, "/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["sessionId"].as_str().unwrap().to_string();
        let selection_uri = format!("/sessions/{}/selection", id);

        let summary = serde_json::to_value(crate::domain::SchemeSummary::fallback()).unwrap();
        let (status, selected) = send(&app, Method::PUT, &selection_uri, Some(summary)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(selected["data"]["title"], "PM-KISAN");
        assert_eq!(selected["data"]["eligibility"], "Landholding farmers");
        assert_eq!(selected["data"]["requiredDocuments"].as_array().unwrap().len(), 2);
        assert_eq!(selected["data"]["applyUrl"], "https://pmkisan.gov.in/");

        let (_, current) = send(&app, Method::GET, &selection_uri, None).await;
        assert_eq!(current["data"]["contactInfo"], "155261");

        let (status, _) = send(&app, Method::DELETE, &selection_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, current) = send(&app, Method::GET, &selection_uri, None).await;
        assert_eq!(current["data"], Value::Null);

        let (status, _) = send(&app, Method::DELETE, &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &selection_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn translations_negotiate_and_fall_back_to_key() {
        let server = mockito::Server::new_async().await;
        let app = app_for(&server);

        let (_, hi) = send(&app, Method::GET, "/translations?lang=hi", None).await;
        assert_eq!(hi["languageCode"], "hi");
        assert_eq!(hi["dictionary"]["close"], "बंद करें");

        let (_, missing) = send(&app, Method::GET, "/translations/pa/loadingDetails", None).await;
        assert_eq!(missing["languageCode"], "pa");
        assert_eq!(missing["value"], "loadingDetails");

        let (_, unknown) = send(&app, Method::GET, "/translations/zz/applyNow", None).await;
        assert_eq!(unknown["languageCode"], "en");
        assert_eq!(unknown["value"], "Apply Now");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let server = mockito::Server::new_async().await;
        let app = app_for(&server);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
