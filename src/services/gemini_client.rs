//! Client for the Gemini `generateContent` endpoint.
//!
//! One call is one POST: no retry, no backoff. The client carries a request
//! timeout so a stalled provider cannot hold a handler forever.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::Settings;
use crate::error::FetchError;

/// Where the API key comes from.
#[derive(Clone, Debug)]
pub enum ApiKey {
    /// Read from the named environment variable on every call. A missing
    /// variable sends an empty key and the provider rejects it.
    FromEnv(String),
    Fixed(String),
}

impl ApiKey {
    fn resolve(&self) -> String {
        match self {
            Self::FromEnv(var) => std::env::var(var).unwrap_or_default(),
            Self::Fixed(key) => key.clone(),
        }
    }
}

/// Client for the generative-language provider.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: ApiKey,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or `""`.
    fn into_first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }
}

impl GeminiClient {
    pub fn new(base_url: &Url, model: &str, api_key: ApiKey, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(&format!("v1beta/models/{}:generateContent", model))
            .with_context(|| format!("Invalid model identifier: {}", model))?;

        tracing::info!(endpoint = %endpoint, timeout_seconds, "Gemini client initialized");

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.gemini_api_url,
            &settings.gemini_model,
            ApiKey::FromEnv(settings.gemini_api_key_var.clone()),
            settings.gemini_timeout_seconds,
        )
    }

    #[allow(dead_code)]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send `prompt` and return the model's raw reply text.
    ///
    /// Any non-2xx status fails with [`FetchError::Http`] without reading
    /// the body. A reply without candidates or parts yields `""`.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String, FetchError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(url = %self.endpoint, "Gemini request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.resolve())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                FetchError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(FetchError::Http(status));
        }

        let envelope = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to decode Gemini envelope");
                FetchError::Envelope(e)
            })?;

        let text = envelope.into_first_text();
        debug!(text_len = text.len(), "Gemini reply received");
        Ok(text)
    }
}
