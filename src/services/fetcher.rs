//! Structured-content fetching: prompt the provider, locate the embedded
//! JSON object, and normalize it into a typed record.
//!
//! Both scheme call sites go through [`StructuredFetcher::fetch`]; they
//! differ only in prompt text and [`Shape`].

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::schemes::{SchemeDetail, SchemeSummary};
use crate::error::FetchError;
use crate::services::gemini_client::GeminiClient;
use crate::services::json_locator;

/// Expected top-level shape of the provider's answer, and how to read it.
pub trait Shape {
    type Record;

    fn name(&self) -> &'static str;

    fn normalize(value: Value) -> Result<Self::Record, FetchError>;
}

/// `{"schemes": [...]}`
#[derive(Debug, Clone, Copy)]
pub struct List;

/// A single detail object.
#[derive(Debug, Clone, Copy)]
pub struct Single;

impl Shape for List {
    type Record = Vec<SchemeSummary>;

    fn name(&self) -> &'static str {
        "list"
    }

    fn normalize(value: Value) -> Result<Self::Record, FetchError> {
        normalize_summaries(value)
    }
}

impl Shape for Single {
    type Record = SchemeDetail;

    fn name(&self) -> &'static str {
        "single"
    }

    fn normalize(value: Value) -> Result<Self::Record, FetchError> {
        normalize_detail(value)
    }
}

/// A prompt together with the shape it asks for.
#[derive(Debug, Clone, Copy)]
pub struct ContentRequest<'a, S> {
    pub prompt: &'a str,
    pub shape: S,
}

impl<'a, S: Shape> ContentRequest<'a, S> {
    pub fn new(prompt: &'a str, shape: S) -> Self {
        Self { prompt, shape }
    }
}

#[derive(Clone)]
pub struct StructuredFetcher {
    client: GeminiClient,
}

impl StructuredFetcher {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// One provider call, then extraction, then `normalize`.
    ///
    /// The result is all-or-nothing: a parse failure never yields a
    /// partially built record.
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    pub async fn fetch_structured<T, F>(
        &self,
        prompt: &str,
        normalize: F,
    ) -> Result<T, FetchError>
    where
        F: FnOnce(Value) -> Result<T, FetchError>,
    {
        let text = self.client.generate_text(prompt).await?;
        let value = json_locator::extract_object(&text)?;
        debug!("Normalizing extracted object");
        normalize(value)
    }

    /// [`Self::fetch_structured`] with the normalizer of the request's shape.
    pub async fn fetch<S: Shape>(
        &self,
        request: ContentRequest<'_, S>,
    ) -> Result<S::Record, FetchError> {
        debug!(shape = request.shape.name(), "Structured fetch");
        self.fetch_structured(request.prompt, S::normalize).await
    }
}

/// Reads the `schemes` array. Missing or `null` is an empty list. Ids are
/// renumbered from 1 in list order.
pub fn normalize_summaries(value: Value) -> Result<Vec<SchemeSummary>, FetchError> {
    let mut schemes: Vec<SchemeSummary> = match value {
        Value::Object(mut map) => match map.remove("schemes") {
            None | Some(Value::Null) => Vec::new(),
            Some(list) => serde_json::from_value(list)?,
        },
        other => serde_json::from_value(other)?,
    };

    for (index, scheme) in schemes.iter_mut().enumerate() {
        scheme.id = index as u32 + 1;
    }

    Ok(schemes)
}

pub fn normalize_detail(value: Value) -> Result<SchemeDetail, FetchError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schemes::SchemeCategory;
    use crate::services::gemini_client::tests::{client_for, envelope, GENERATE_PATH};
    use serde_json::json;

    #[test]
    fn missing_or_empty_schemes_is_an_empty_list() {
        assert!(normalize_summaries(json!({})).unwrap().is_empty());
        assert!(normalize_summaries(json!({ "schemes": [] })).unwrap().is_empty());
        assert!(normalize_summaries(json!({ "schemes": null })).unwrap().is_empty());
    }

    #[test]
    fn ids_are_renumbered_in_order() {
        let schemes = normalize_summaries(json!({
            "schemes": [
                { "id": 7, "title": "PMFBY", "category": "insurance" },
                { "id": "x", "title": "PM-KUSUM", "category": "equipment" }
            ]
        }))
        .unwrap();

        assert_eq!(schemes.len(), 2);
        assert_eq!((schemes[0].id, schemes[0].title.as_str()), (1, "PMFBY"));
        assert_eq!((schemes[1].id, schemes[1].title.as_str()), (2, "PM-KUSUM"));
        assert_eq!(schemes[1].category, SchemeCategory::Equipment);
    }

    #[test]
    fn non_object_entries_reject_the_whole_list() {
        let result = normalize_summaries(json!({ "schemes": [{ "title": "ok" }, "bad"] }));
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn fetch_reads_the_requested_shape() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(envelope(concat!(
                "Here is the data:\n```json\n",
                r#"{"title": "PM-KISAN", "requiredDocuments": ["Aadhaar Card"]}"#,
                "\n```",
            )))
            .create_async()
            .await;
        let fetcher = StructuredFetcher::new(client_for(&server));

        let detail = fetcher
            .fetch(ContentRequest::new("details", Single))
            .await
            .unwrap();

        assert_eq!(detail.title, "PM-KISAN");
        assert_eq!(detail.required_documents, vec!["Aadhaar Card".to_string()]);
    }

    #[tokio::test]
    async fn empty_reply_text_has_no_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;
        let fetcher = StructuredFetcher::new(client_for(&server));

        let err = fetcher
            .fetch_structured("x", normalize_summaries)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NoJsonFound));
    }
}
