//! Shared mock collaborators for pipeline tests.

use async_trait::async_trait;
use deepbrief_core::error::{ProviderError, SearchError};
use deepbrief_core::provider::{CompletionProvider, CompletionRequest, CompletionResponse, Usage};
use deepbrief_core::search::{SearchProvider, SearchResult};
use std::sync::Mutex;
use std::time::Duration;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl CompletionProvider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let content = responses[*count].clone();
        *count += 1;

        Ok(CompletionResponse {
            content,
            model: "mock-model".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A provider whose every call fails with a network error.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }
}

/// A search provider returning one fixed result, optionally with
/// extractable content.
pub struct StaticSearchProvider {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl StaticSearchProvider {
    /// Search hit plus full-text content behind its url.
    pub fn with_content(title: &str, url: &str, content: &str) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            content: Some(content.into()),
        }
    }

    /// Search hit whose url extracts to nothing.
    pub fn without_content(title: &str, url: &str) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            content: None,
        }
    }

    /// A degenerate hit with no title and no url.
    pub fn untitled() -> Self {
        Self {
            title: None,
            url: None,
            content: None,
        }
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    fn name(&self) -> &str {
        "static_mock"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        Ok(vec![SearchResult {
            title: self.title.clone(),
            url: self.url.clone(),
            snippet: None,
        }])
    }

    async fn extract(&self, _url: &str) -> Result<Option<String>, SearchError> {
        Ok(self.content.clone())
    }
}

/// A search provider whose every call fails with a network error.
pub struct FailingSearchProvider;

#[async_trait]
impl SearchProvider for FailingSearchProvider {
    fn name(&self) -> &str {
        "failing_search_mock"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        Err(SearchError::Network("connection refused".into()))
    }

    async fn extract(&self, _url: &str) -> Result<Option<String>, SearchError> {
        Err(SearchError::Network("connection refused".into()))
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(false)
    }
}

/// A search provider that echoes the query back as the result title and
/// sleeps first when the query contains "slow" — used to verify that
/// citation order is pinned to planning order, not completion order.
pub struct EchoSearchProvider;

#[async_trait]
impl SearchProvider for EchoSearchProvider {
    fn name(&self) -> &str {
        "echo_mock"
    }

    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        if query.contains("slow") {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Ok(vec![SearchResult {
            title: Some(query.to_string()),
            url: Some(format!("https://docs.example/{}", query.replace(' ', "-"))),
            snippet: None,
        }])
    }

    async fn extract(&self, _url: &str) -> Result<Option<String>, SearchError> {
        Ok(None)
    }
}
