//! CompletionProvider trait — the abstraction over the text-completion
//! service.
//!
//! A provider knows how to send a prompt to an LLM backend and return the
//! generated text. The planner additionally needs a structured
//! list-of-strings completion; a lenient default implementation is provided
//! so every backend supports it, and backends with native structured output
//! can override it.
//!
//! Implementations: OpenAI-compatible endpoints (OpenAI, OpenRouter,
//! Ollama, vLLM, ...), plus scripted mocks for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Configuration for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gemma3:4b", "gpt-4o")
    pub model: String,

    /// The fully rendered prompt
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The completion-service trait.
///
/// The pipeline calls `complete()` or `complete_list()` without knowing
/// which backend is behind it — pure polymorphism.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a prompt and get the generated text back.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Send a prompt and get a list of strings back.
    ///
    /// Default implementation appends a JSON-array instruction to the
    /// prompt, calls `complete()`, and parses the output leniently.
    /// Backends with native structured output should override this.
    async fn complete_list(
        &self,
        mut request: CompletionRequest,
    ) -> std::result::Result<Vec<String>, ProviderError> {
        request.prompt.push_str(
            "\n\nAnswer ONLY with a JSON array of strings, with no surrounding prose.",
        );
        let response = self.complete(request).await?;
        Ok(parse_string_list(&response.content))
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Parse a list of strings out of model output.
///
/// Accepts a bare JSON array, a fenced ```json block, an array embedded in
/// surrounding prose, or (as a last resort) one entry per non-empty line
/// with leading bullets/numbering stripped. Returns an empty vec only when
/// nothing usable is found; callers treat that as a fallback trigger.
pub fn parse_string_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if let Ok(items) = serde_json::from_str::<Vec<String>>(text) {
        return clean_items(items);
    }

    // Array embedded in prose or a code fence.
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            if let Ok(items) = serde_json::from_str::<Vec<String>>(&text[start..=end]) {
                return clean_items(items);
            }
        }
    }

    // Line-split fallback.
    clean_items(
        text.lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches(['-', '*', '•'])
                    .trim_start_matches(|c: char| c.is_ascii_digit())
                    .trim_start_matches(['.', ')', ':'])
                    .trim()
                    .trim_matches('"')
                    .to_string()
            })
            .collect(),
    )
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = CompletionRequest::new("gpt-4o", "hello");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn parse_bare_json_array() {
        let out = parse_string_list(r#"["alpha", "beta"]"#);
        assert_eq!(out, vec!["alpha", "beta"]);
    }

    #[test]
    fn parse_fenced_json_array() {
        let out = parse_string_list("```json\n[\"one\", \"two\"]\n```");
        assert_eq!(out, vec!["one", "two"]);
    }

    #[test]
    fn parse_array_embedded_in_prose() {
        let out = parse_string_list("Here are the queries:\n[\"q1\", \"q2\"]\nGood luck!");
        assert_eq!(out, vec!["q1", "q2"]);
    }

    #[test]
    fn parse_bulleted_lines() {
        let out = parse_string_list("- first query\n- second query\n");
        assert_eq!(out, vec!["first query", "second query"]);
    }

    #[test]
    fn parse_numbered_lines() {
        let out = parse_string_list("1. first\n2. second");
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn parse_empty_and_blank_items_dropped() {
        assert!(parse_string_list("").is_empty());
        assert!(parse_string_list("   \n  ").is_empty());
        assert_eq!(parse_string_list(r#"["", "  ", "kept"]"#), vec!["kept"]);
    }
}
