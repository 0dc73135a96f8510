pub mod record;
pub mod schema;

pub use record::{PageRecord, SearchResultRecord};
pub use schema::{FieldKind, FieldSpec, RecordSchema};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::agents::extraction::{ExtractionAgent, SessionHandle};
use crate::config::TimeoutConfig;
use crate::error::{ExtractionError, Result};
use crate::query::EncodedQuery;

/// Results per search-results page. Offsets are always multiples of this.
pub const PAGE_SIZE: u32 = 10;

const EXTRACT_INSTRUCTION: &str = "What are all 10 results on the search results page?";

/// Builds the search URL for one page. `udm=14` selects the plain
/// web-results view, suppressing the AI-generated summary layer.
pub fn search_url(root_url: &str, query: &EncodedQuery, offset: u32) -> String {
    format!("{}search?q={}&udm=14&start={}", root_url, query, offset)
}

/// Extracts exactly one page's worth of structured records from a live
/// session, tagged with the originating question.
pub struct PageExtractor {
    agent: Arc<dyn ExtractionAgent>,
    root_url: String,
    timeouts: TimeoutConfig,
    schema: RecordSchema,
}

impl PageExtractor {
    pub fn new(agent: Arc<dyn ExtractionAgent>, root_url: String, timeouts: TimeoutConfig) -> Self {
        Self {
            agent,
            root_url,
            timeouts,
            schema: RecordSchema::search_results(),
        }
    }

    pub async fn extract_page(
        &self,
        session: SessionHandle,
        query: &EncodedQuery,
        offset: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        let url = search_url(&self.root_url, query, offset);
        debug!("Session {} extracting page at {}", session, url);

        bounded(
            self.timeouts.navigation,
            "navigation",
            cancel,
            self.agent.navigate(&session, &url),
        )
        .await?;

        let raw = bounded(
            self.timeouts.extraction,
            "structured extraction",
            cancel,
            self.agent
                .extract_structured(&session, EXTRACT_INSTRUCTION, &self.schema),
        )
        .await?;

        let records = self.schema.validate(&raw)?;

        let question = query.decode();
        Ok(records
            .into_iter()
            .map(|record| record.tagged(question.clone()))
            .collect())
    }
}

/// Races a fallible operation against its timeout and the cancellation
/// token. Every navigation and extraction in the pipeline runs bounded.
async fn bounded<T>(
    limit: Duration,
    what: &'static str,
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(ExtractionError::Cancelled);
    }

    tokio::select! {
        _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
        outcome = tokio::time::timeout(limit, operation) => match outcome {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Timeout(what, limit)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_query_view_and_offset() {
        let query = EncodedQuery::encode("allintext:\"nathan daeila\"");
        assert_eq!(
            search_url("https://www.google.com/", &query, 20),
            "https://www.google.com/search?q=allintext%3A%22nathan%20daeila%22&udm=14&start=20"
        );
    }

    #[test]
    fn page_offsets_are_multiples_of_page_size() {
        let query = EncodedQuery::encode("q");
        for page_index in 0..4u32 {
            let url = search_url("https://www.google.com/", &query, page_index * PAGE_SIZE);
            assert!(url.ends_with(&format!("start={}", page_index * 10)));
        }
    }
}
