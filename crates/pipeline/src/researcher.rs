//! Researcher — runs one sub-query to a finding.
//!
//! Each external call (search, extract, summarize) is guarded
//! independently: a failure degrades the finding's content instead of
//! aborting the branch, so one outage never poisons sibling branches.

use std::sync::Arc;
use std::time::Duration;

use deepbrief_core::event::{EventBus, ProgressEvent, Stage};
use deepbrief_core::provider::{CompletionProvider, CompletionRequest};
use deepbrief_core::search::{SearchProvider, SearchResult};
use deepbrief_core::state::Finding;
use tracing::{debug, warn};

use crate::prompts;

/// Researches a single sub-query into exactly one [`Finding`].
pub struct Researcher {
    provider: Arc<dyn CompletionProvider>,
    search: Arc<dyn SearchProvider>,
    events: Arc<EventBus>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Researcher {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
        events: Arc<EventBus>,
        config: &deepbrief_config::AppConfig,
    ) -> Self {
        Self {
            provider,
            search,
            events,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Research one sub-query. Infallible by design: always returns a
    /// Finding, degraded as far as a placeholder source with no summary.
    ///
    /// `index` is the branch's planning-order position, used only for
    /// progress events; the caller keeps it alongside the Finding for
    /// stable citation numbering.
    pub async fn research(&self, index: usize, query: &str, user_input: &str) -> Finding {
        debug!(index, query, "Research branch started");

        // Step 1: top-1 search, no full text.
        let result = self.top_result(index, query).await;

        // Step 2: full-text extraction for the chosen url.
        let content = match &result.url {
            Some(url) => self.extract_content(index, url).await,
            None => String::new(),
        };

        // Step 3: summarize non-empty content.
        let resume = if content.trim().is_empty() {
            None
        } else {
            self.summarize(index, user_input, &content).await
        };

        let finding = Finding {
            title: result.title,
            url: result.url,
            resume,
        };

        self.events.publish(ProgressEvent::FindingReady {
            index,
            title: finding.title.clone(),
            url: finding.url.clone(),
        });

        finding
    }

    async fn top_result(&self, index: usize, query: &str) -> SearchResult {
        match tokio::time::timeout(self.timeout, self.search.search(query, 1)).await {
            Ok(Ok(mut results)) if !results.is_empty() => {
                let mut result = results.remove(0);
                // Guarantee a locator even when the backend omits one.
                if result.url.is_none() {
                    result.url = Some(placeholder_url(query));
                }
                if result.title.is_none() {
                    result.title = Some(query.to_string());
                }
                result
            }
            Ok(Ok(_)) => {
                self.note_fallback(index, "search returned no results");
                placeholder_result(query)
            }
            Ok(Err(e)) => {
                self.note_fallback(index, &format!("search failed: {e}"));
                placeholder_result(query)
            }
            Err(_) => {
                self.note_fallback(
                    index,
                    &format!("search timed out after {}s", self.timeout.as_secs()),
                );
                placeholder_result(query)
            }
        }
    }

    async fn extract_content(&self, index: usize, url: &str) -> String {
        match tokio::time::timeout(self.timeout, self.search.extract(url)).await {
            Ok(Ok(Some(content))) => content,
            Ok(Ok(None)) => String::new(),
            Ok(Err(e)) => {
                self.note_fallback(index, &format!("extraction failed: {e}"));
                String::new()
            }
            Err(_) => {
                self.note_fallback(
                    index,
                    &format!("extraction timed out after {}s", self.timeout.as_secs()),
                );
                String::new()
            }
        }
    }

    async fn summarize(&self, index: usize, user_input: &str, content: &str) -> Option<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::summarize_results(user_input, content),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => {
                let text = response.content.trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            }
            Ok(Err(e)) => {
                self.note_fallback(index, &format!("summarization failed: {e}"));
                None
            }
            Err(_) => {
                self.note_fallback(
                    index,
                    &format!("summarization timed out after {}s", self.timeout.as_secs()),
                );
                None
            }
        }
    }

    fn note_fallback(&self, index: usize, reason: &str) {
        warn!(index, reason, "Research branch degraded");
        self.events.publish(ProgressEvent::FallbackUsed {
            stage: Stage::Research,
            reason: format!("branch {index}: {reason}"),
        });
    }
}

/// Deterministic placeholder locator for a query with no search result.
pub fn placeholder_url(query: &str) -> String {
    format!("https://example.com/search?q={}", query.replace(' ', "+"))
}

/// Placeholder result used when search fails or comes back empty.
pub fn placeholder_result(query: &str) -> SearchResult {
    SearchResult {
        title: Some(query.to_string()),
        url: Some(placeholder_url(query)),
        snippet: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        FailingProvider, FailingSearchProvider, SequentialMockProvider, StaticSearchProvider,
    };
    use deepbrief_config::AppConfig;

    fn researcher(
        provider: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> Researcher {
        Researcher::new(
            provider,
            search,
            Arc::new(EventBus::default()),
            &AppConfig::default(),
        )
    }

    #[tokio::test]
    async fn happy_path_summarizes_extracted_content() {
        let search = Arc::new(StaticSearchProvider::with_content(
            "Polar Bear Status Report",
            "https://wwf.example/polar-bears",
            "Full report text about polar bear populations.",
        ));
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "Populations are declining due to sea-ice loss.".into(),
        ]));

        let finding = researcher(provider, search)
            .research(0, "polar bear population decline", "climate change question")
            .await;

        assert_eq!(finding.title.as_deref(), Some("Polar Bear Status Report"));
        assert_eq!(finding.url.as_deref(), Some("https://wwf.example/polar-bears"));
        assert_eq!(
            finding.resume.as_deref(),
            Some("Populations are declining due to sea-ice loss.")
        );
    }

    #[tokio::test]
    async fn search_failure_produces_placeholder() {
        let finding = researcher(Arc::new(FailingProvider), Arc::new(FailingSearchProvider))
            .research(2, "polar bear diet", "question")
            .await;

        assert_eq!(finding.title.as_deref(), Some("polar bear diet"));
        assert_eq!(
            finding.url.as_deref(),
            Some("https://example.com/search?q=polar+bear+diet")
        );
        assert!(finding.resume.is_none());
    }

    #[tokio::test]
    async fn empty_extraction_skips_summarization() {
        // Search succeeds but extract has nothing; the (failing) provider
        // must never be called.
        let search = Arc::new(StaticSearchProvider::without_content(
            "Thin Page",
            "https://thin.example/page",
        ));

        let finding = researcher(Arc::new(FailingProvider), search)
            .research(0, "query", "question")
            .await;

        assert_eq!(finding.title.as_deref(), Some("Thin Page"));
        assert!(finding.resume.is_none());
    }

    #[tokio::test]
    async fn summarization_failure_degrades_to_no_resume() {
        let search = Arc::new(StaticSearchProvider::with_content(
            "Rich Page",
            "https://rich.example/page",
            "plenty of content",
        ));

        let finding = researcher(Arc::new(FailingProvider), search)
            .research(0, "query", "question")
            .await;

        assert_eq!(finding.title.as_deref(), Some("Rich Page"));
        assert_eq!(finding.url.as_deref(), Some("https://rich.example/page"));
        assert!(finding.resume.is_none());
    }

    #[tokio::test]
    async fn result_without_url_gets_placeholder_locator() {
        let search = Arc::new(StaticSearchProvider::untitled());

        let finding = researcher(Arc::new(FailingProvider), search)
            .research(0, "some query", "question")
            .await;

        assert_eq!(finding.title.as_deref(), Some("some query"));
        assert_eq!(
            finding.url.as_deref(),
            Some("https://example.com/search?q=some+query")
        );
    }

    #[test]
    fn placeholder_url_encodes_spaces_as_plus() {
        assert_eq!(
            placeholder_url("impact of climate change"),
            "https://example.com/search?q=impact+of+climate+change"
        );
    }
}
