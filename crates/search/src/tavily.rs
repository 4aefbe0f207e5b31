//! Tavily search client.
//!
//! Two endpoints:
//! - `POST /search` — query → ranked results (title, url, snippet)
//! - `POST /extract` — url → extracted full-text content
//!
//! Both calls can fail or return nothing; callers are expected to treat
//! either outcome as a degraded result, not an abort.

use async_trait::async_trait;
use deepbrief_core::error::SearchError;
use deepbrief_core::search::{SearchProvider, SearchResult};
use serde::Deserialize;
use tracing::{debug, warn};

/// A Tavily-API search provider.
pub struct TavilySearch {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl TavilySearch {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, SearchError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(SearchError::NotConfigured(
                "Invalid search API key".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search service returned error");
            return Err(SearchError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<SearchResult>, SearchError> {
        debug!(query, limit, "Sending search request");

        let body = serde_json::json!({
            "query": query,
            "max_results": limit.max(1),
            "include_raw_content": false,
        });

        let response = self.post("/search", body).await?;
        let api: SearchApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        Ok(api
            .results
            .into_iter()
            .take(limit.max(1))
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect())
    }

    async fn extract(&self, url: &str) -> std::result::Result<Option<String>, SearchError> {
        debug!(url, "Sending extract request");

        let body = serde_json::json!({ "urls": [url] });

        let response = self.post("/extract", body).await?;
        let api: ExtractApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        Ok(api
            .results
            .into_iter()
            .next()
            .and_then(|r| r.raw_content)
            .filter(|c| !c.trim().is_empty()))
    }

    async fn health_check(&self) -> std::result::Result<bool, SearchError> {
        // Tavily has no dedicated health endpoint; a minimal search doubles
        // as a reachability and credentials check.
        match self.search("ping", 1).await {
            Ok(_) => Ok(true),
            Err(SearchError::NotConfigured(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// ── API wire types ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchApiResponse {
    #[serde(default)]
    results: Vec<SearchApiResult>,
}

#[derive(Deserialize)]
struct SearchApiResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ExtractApiResponse {
    #[serde(default)]
    results: Vec<ExtractApiResult>,
}

#[derive(Deserialize)]
struct ExtractApiResult {
    #[serde(default)]
    raw_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let search = TavilySearch::new("https://api.tavily.com/", "key");
        assert_eq!(search.base_url, "https://api.tavily.com");
    }

    #[test]
    fn search_response_parses_partial_results() {
        let api: SearchApiResponse = serde_json::from_str(
            r#"{"results": [{"title": "T", "url": "https://a.example"}, {}]}"#,
        )
        .unwrap();
        assert_eq!(api.results.len(), 2);
        assert_eq!(api.results[0].title.as_deref(), Some("T"));
        assert!(api.results[1].url.is_none());
    }

    #[test]
    fn extract_response_parses_raw_content() {
        let api: ExtractApiResponse = serde_json::from_str(
            r#"{"results": [{"raw_content": "full text here"}]}"#,
        )
        .unwrap();
        assert_eq!(
            api.results[0].raw_content.as_deref(),
            Some("full text here")
        );
    }

    #[test]
    fn extract_response_tolerates_empty() {
        let api: ExtractApiResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(api.results.is_empty());
    }
}
