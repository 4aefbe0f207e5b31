//! Configuration loading, validation, and management for deepbrief.
//!
//! Loads configuration from `~/.deepbrief/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.deepbrief/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion provider kind: "ollama", "openai", or "openrouter"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for the completion provider (not needed for ollama)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override the provider base URL (e.g., a local Ollama endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model used for summarization and final synthesis
    #[serde(default = "default_model")]
    pub model: String,

    /// Smaller model used for query planning
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    /// Temperature for completion calls
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-external-call timeout in seconds (completion, search, extract)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on the number of sub-queries researched per question
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Search service configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Front-end verbosity flag
    #[serde(default)]
    pub debug: bool,
}

fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "gemma3:4b".into()
}
fn default_reasoning_model() -> String {
    "llama3.2:3b".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_queries() -> usize {
    10
}

/// Search service settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Search API base URL
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
}

fn default_search_base_url() -> String {
    "https://api.tavily.com".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("reasoning_model", &self.reasoning_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_queries", &self.max_queries)
            .field("search", &self.search)
            .field("debug", &self.debug)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.deepbrief/config.toml).
    ///
    /// Also checks environment variables:
    /// - `DEEPBRIEF_API_KEY` / `OPENROUTER_API_KEY` / `OPENAI_API_KEY`
    /// - `TAVILY_API_KEY`
    /// - `DEEPBRIEF_PROVIDER`, `DEEPBRIEF_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("DEEPBRIEF_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if config.search.api_key.is_none() {
            config.search.api_key = std::env::var("TAVILY_API_KEY").ok();
        }

        if let Ok(provider) = std::env::var("DEEPBRIEF_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DEEPBRIEF_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".deepbrief")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.provider.as_str(), "ollama" | "openai" | "openrouter") {
            return Err(ConfigError::ValidationError(format!(
                "provider must be one of ollama/openai/openrouter, got '{}'",
                self.provider
            )));
        }

        if self.provider != "ollama" && self.api_key.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "provider '{}' requires an api_key (set DEEPBRIEF_API_KEY or edit the config)",
                self.provider
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !(1..=20).contains(&self.max_queries) {
            return Err(ConfigError::ValidationError(
                "max_queries must be between 1 and 20".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: None,
            model: default_model(),
            reasoning_model: default_reasoning_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_queries: default_max_queries(),
            search: SearchConfig::default(),
            debug: false,
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for deepbrief_core::Error {
    fn from(e: ConfigError) -> Self {
        deepbrief_core::Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "gemma3:4b");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.search.base_url, config.search.base_url);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_provider_rejected() {
        let config = AppConfig {
            provider: "carrier-pigeon".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn remote_provider_requires_api_key() {
        let config = AppConfig {
            provider: "openai".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            provider: "openai".into(),
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().provider, "ollama");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
provider = "openrouter"
api_key = "or-test"
model = "anthropic/claude-sonnet-4"
max_queries = 6

[search]
api_key = "tvly-test"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "openrouter");
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.max_queries, 6);
        assert_eq!(config.search.api_key.as_deref(), Some("tvly-test"));
        // Unset fields keep their defaults
        assert_eq!(config.reasoning_model, "llama3.2:3b");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("ollama"));
        assert!(toml_str.contains("tavily"));
    }
}
