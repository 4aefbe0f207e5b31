//! Query planner — turns the user's question into a set of sub-queries.
//!
//! The planner never fails the pipeline: if the completion call errors,
//! times out, or returns nothing, it degrades through a deterministic
//! two-tier fallback (split on `?`, then the raw question itself).

use std::sync::Arc;
use std::time::Duration;

use deepbrief_core::event::{EventBus, ProgressEvent, Stage};
use deepbrief_core::provider::{CompletionProvider, CompletionRequest};
use tracing::{debug, warn};

use crate::prompts;

/// Plans research sub-queries for a question.
pub struct QueryPlanner {
    provider: Arc<dyn CompletionProvider>,
    events: Arc<EventBus>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl QueryPlanner {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        events: Arc<EventBus>,
        config: &deepbrief_config::AppConfig,
    ) -> Self {
        Self {
            provider,
            events,
            // Planning runs on the smaller reasoning model
            model: config.reasoning_model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Produce an ordered list of sub-queries. Infallible by design.
    ///
    /// Empty input yields an empty plan; non-empty input always yields at
    /// least one sub-query, even when the completion service is down.
    pub async fn plan(&self, user_input: &str) -> Vec<String> {
        let input = user_input.trim();
        if input.is_empty() {
            return Vec::new();
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::build_queries(input),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let planned =
            match tokio::time::timeout(self.timeout, self.provider.complete_list(request)).await {
                Ok(Ok(queries)) => {
                    let queries: Vec<String> = queries
                        .into_iter()
                        .map(|q| q.trim().to_string())
                        .filter(|q| !q.is_empty())
                        .collect();
                    if queries.is_empty() {
                        self.note_fallback("planner returned an empty plan");
                        None
                    } else {
                        Some(queries)
                    }
                }
                Ok(Err(e)) => {
                    self.note_fallback(&format!("planning call failed: {e}"));
                    None
                }
                Err(_) => {
                    self.note_fallback(&format!(
                        "planning call timed out after {}s",
                        self.timeout.as_secs()
                    ));
                    None
                }
            };

        let queries = planned.unwrap_or_else(|| fallback_plan(input));
        debug!(count = queries.len(), "Plan ready");
        queries
    }

    fn note_fallback(&self, reason: &str) {
        warn!(reason, "Planner: falling back to question splitting");
        self.events.publish(ProgressEvent::FallbackUsed {
            stage: Stage::Plan,
            reason: reason.to_string(),
        });
    }
}

/// Deterministic plan derived from the question text alone.
///
/// Splits on `?` and trims; a question with no `?` segments becomes a
/// single-element plan.
fn fallback_plan(input: &str) -> Vec<String> {
    let segments: Vec<String> = input
        .split('?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if !segments.is_empty() {
        segments
    } else if !input.is_empty() {
        vec![input.to_string()]
    } else {
        Vec::new()
    }
}
