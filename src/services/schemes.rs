//! Scheme list and detail lookups on top of the structured fetcher.

use tracing::{info, instrument, warn};

use crate::domain::schemes::{SchemeDetail, SchemeSummary};
use crate::error::FetchError;
use crate::services::fetcher::{ContentRequest, List, Single, StructuredFetcher};
use crate::services::prompts::{build_detail_prompt, SUMMARIES_PROMPT};

/// Result of a list fetch. On failure `schemes` holds the fallback record
/// and `error` says why.
#[derive(Debug)]
pub struct SummariesOutcome {
    pub schemes: Vec<SchemeSummary>,
    pub error: Option<FetchError>,
}

impl SummariesOutcome {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct SchemeService {
    fetcher: StructuredFetcher,
}

impl SchemeService {
    pub fn new(fetcher: StructuredFetcher) -> Self {
        Self { fetcher }
    }

    /// Current schemes. Never fails: any fetch error is swapped for the
    /// single PM-KISAN record. An empty provider list stays empty.
    #[instrument(skip(self))]
    pub async fn fetch_summaries(&self) -> SummariesOutcome {
        match self
            .fetcher
            .fetch(ContentRequest::new(SUMMARIES_PROMPT, List))
            .await
        {
            Ok(schemes) => {
                info!(count = schemes.len(), "Fetched scheme list");
                SummariesOutcome {
                    schemes,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Scheme list fetch failed, using fallback");
                SummariesOutcome {
                    schemes: vec![SchemeSummary::fallback()],
                    error: Some(e),
                }
            }
        }
    }

    /// Details for one scheme. There is no fallback for details.
    #[instrument(skip(self))]
    pub async fn fetch_detail(&self, title: &str) -> Result<SchemeDetail, FetchError> {
        let prompt = build_detail_prompt(title);
        let detail = self
            .fetcher
            .fetch(ContentRequest::new(&prompt, Single))
            .await?;
        info!(
            documents = detail.required_documents.len(),
            "Fetched scheme detail"
        );
        Ok(detail)
    }
}
