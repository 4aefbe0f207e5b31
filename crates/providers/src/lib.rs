//! Completion-service implementations for deepbrief.
//!
//! All providers implement the `deepbrief_core::CompletionProvider` trait.
//! `from_config` selects the right backend from the application config.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use deepbrief_core::error::ProviderError;

/// Build a completion provider from the application config.
pub fn from_config(
    config: &deepbrief_config::AppConfig,
) -> Result<OpenAiCompatProvider, ProviderError> {
    match config.provider.as_str() {
        "ollama" => Ok(OpenAiCompatProvider::ollama(config.base_url.as_deref())),
        "openai" => {
            let key = require_key(config, "openai")?;
            Ok(match &config.base_url {
                Some(url) => OpenAiCompatProvider::new("openai", url, key),
                None => OpenAiCompatProvider::openai(key),
            })
        }
        "openrouter" => {
            let key = require_key(config, "openrouter")?;
            Ok(match &config.base_url {
                Some(url) => OpenAiCompatProvider::new("openrouter", url, key),
                None => OpenAiCompatProvider::openrouter(key),
            })
        }
        other => Err(ProviderError::NotConfigured(format!(
            "Unknown provider '{other}'"
        ))),
    }
}

fn require_key<'a>(
    config: &'a deepbrief_config::AppConfig,
    provider: &str,
) -> Result<&'a str, ProviderError> {
    config.api_key.as_deref().ok_or_else(|| {
        ProviderError::NotConfigured(format!("Provider '{provider}' requires an API key"))
    })
}
