//! Web-search and content-extraction client for deepbrief.
//!
//! Implements the `deepbrief_core::SearchProvider` trait against a
//! Tavily-style HTTP API (`/search` + `/extract`).

pub mod tavily;

pub use tavily::TavilySearch;

use deepbrief_core::error::SearchError;

/// Build a search provider from the application config.
pub fn from_config(
    config: &deepbrief_config::AppConfig,
) -> Result<TavilySearch, SearchError> {
    let api_key = config.search.api_key.as_deref().ok_or_else(|| {
        SearchError::NotConfigured(
            "Search requires an API key (set TAVILY_API_KEY or edit the config)".into(),
        )
    })?;
    Ok(TavilySearch::new(&config.search.base_url, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepbrief_core::SearchProvider;

    #[test]
    fn from_config_requires_api_key() {
        let config = deepbrief_config::AppConfig::default();
        assert!(from_config(&config).is_err());
    }

    #[test]
    fn from_config_builds_client() {
        let mut config = deepbrief_config::AppConfig::default();
        config.search.api_key = Some("tvly-test".into());
        let search = from_config(&config).unwrap();
        assert_eq!(search.name(), "tavily");
    }
}
