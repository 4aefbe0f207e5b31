//! SearchProvider trait — the abstraction over the web-search service.
//!
//! Two operations: query → results, and url → extracted full text. Both
//! may fail or come back empty; the pipeline treats either outcome as a
//! fallback trigger, never a crash.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One search hit. `raw_content` is only populated by `extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Short result snippet, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// The search-service trait.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A human-readable name for this backend (e.g., "tavily").
    fn name(&self) -> &str;

    /// Search the web, returning at most `limit` results without full text.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<SearchResult>, SearchError>;

    /// Fetch extracted full-text content for a url.
    ///
    /// `Ok(None)` means the backend had nothing for this url; callers treat
    /// it the same as empty content.
    async fn extract(&self, url: &str) -> std::result::Result<Option<String>, SearchError>;

    /// Health check — can we reach the search service?
    async fn health_check(&self) -> std::result::Result<bool, SearchError> {
        Ok(true)
    }
}
