mod api;
mod app;
mod config;
mod domain;
mod error;
mod i18n;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;

use i18n::Translations;
use services::{GeminiClient, SchemeService, StructuredFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        model = %settings.gemini_model,
        "Starting Kisan schemes backend"
    );

    if std::env::var(&settings.gemini_api_key_var).is_err() {
        // Not fatal: the key is resolved per call and may appear later
        tracing::warn!(var = %settings.gemini_api_key_var, "Gemini API key is not set");
    }

    let gemini = GeminiClient::from_settings(&settings)?;
    let schemes = SchemeService::new(StructuredFetcher::new(gemini));

    let translations = Translations::load_bundled(&settings.default_language)?;

    let state = app::AppState::new(settings.clone(), schemes, translations);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
