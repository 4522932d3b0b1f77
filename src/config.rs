use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

use crate::logging::LogFormat;
use crate::services::SessionLimits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub log_format: LogFormat,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Generative-language provider
    pub gemini_api_url: Url,
    pub gemini_model: String,
    /// Name of the variable holding the API key. The key itself is read
    /// at call time, never at startup.
    pub gemini_api_key_var: String,
    pub gemini_timeout_seconds: u64,

    // Localization
    pub default_language: String,

    // Selection sessions
    pub session_idle_seconds: u64,
    pub max_sessions: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_format = LogFormat::resolve(env::var("LOG_FORMAT").ok().as_deref(), &env);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Generative-language provider
        let gemini_api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let gemini_api_url = Url::parse(&gemini_api_url)
            .with_context(|| format!("GEMINI_API_URL is not a valid URL: {}", gemini_api_url))?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let gemini_api_key_var =
            env::var("GEMINI_API_KEY_VAR").unwrap_or_else(|_| "GEMINI_API_KEY".to_string());
        let gemini_timeout_seconds = env::var("GEMINI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Localization
        let default_language = env::var("DEFAULT_LANGUAGE")
            .map(|s| s.trim().to_lowercase())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "en".to_string());

        // Selection sessions
        let session_idle_seconds = env::var("SESSION_IDLE_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1800);
        let max_sessions = env::var("MAX_SESSIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(10_000);

        Ok(Settings {
            env,
            server_addr,
            log_format,
            cors_allow_origins,
            gemini_api_url,
            gemini_model,
            gemini_api_key_var,
            gemini_timeout_seconds,
            default_language,
            session_idle_seconds,
            max_sessions,
        })
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            idle_timeout: Duration::from_secs(self.session_idle_seconds),
            max_sessions: self.max_sessions,
        }
    }
}
