//! Synthesizer — merges all findings into the cited final report.
//!
//! The primary path asks the completion service for 500-800 words of cited
//! prose and appends the reference list. The fallback path is fully
//! deterministic: the rendered findings block plus references, prefixed
//! with a synthesis-unavailable notice. Citation numbering is 1-based in
//! the order the findings are passed in (planning order).

use std::sync::Arc;
use std::time::Duration;

use deepbrief_core::event::{EventBus, ProgressEvent, Stage};
use deepbrief_core::provider::{CompletionProvider, CompletionRequest};
use deepbrief_core::state::Finding;
use tracing::warn;

use crate::prompts;

/// Notice prefixed to the deterministic fallback report.
const FALLBACK_NOTICE: &str =
    "Synthesis was unavailable; the raw research findings are listed below.";

/// Notice used when there were no findings at all.
const EMPTY_NOTICE: &str = "No research findings were collected for this question.";

/// Produces the final report from the collected findings.
pub struct Synthesizer {
    provider: Arc<dyn CompletionProvider>,
    events: Arc<EventBus>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        events: Arc<EventBus>,
        config: &deepbrief_config::AppConfig,
    ) -> Self {
        Self {
            provider,
            events,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Synthesize the final report. Infallible by design.
    pub async fn synthesize(&self, user_input: &str, findings: &[Finding]) -> String {
        if findings.is_empty() {
            self.note_fallback("no findings to synthesize");
            return format!("{EMPTY_NOTICE}\n\nReferences:\n");
        }

        let rendered = render_findings(findings);
        let references = render_references(findings);

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::final_response(user_input, &rendered),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let prose =
            match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
                Ok(Ok(response)) => {
                    let text = response.content.trim().to_string();
                    if text.is_empty() {
                        self.note_fallback("synthesis returned no usable content");
                        None
                    } else {
                        Some(text)
                    }
                }
                Ok(Err(e)) => {
                    self.note_fallback(&format!("synthesis call failed: {e}"));
                    None
                }
                Err(_) => {
                    self.note_fallback(&format!(
                        "synthesis call timed out after {}s",
                        self.timeout.as_secs()
                    ));
                    None
                }
            };

        match prose {
            Some(prose) => format!("{prose}\n\nReferences:\n{references}"),
            None => format!("{FALLBACK_NOTICE}\n\n{rendered}\nReferences:\n{references}"),
        }
    }

    fn note_fallback(&self, reason: &str) {
        warn!(reason, "Synthesizer: falling back to raw findings report");
        self.events.publish(ProgressEvent::FallbackUsed {
            stage: Stage::Synthesize,
            reason: reason.to_string(),
        });
    }
}

/// Render all findings into the numbered plain-text block fed to the
/// synthesis prompt and used verbatim by the fallback report.
pub fn render_findings(findings: &[Finding]) -> String {
    let mut block = String::new();
    for (i, finding) in findings.iter().enumerate() {
        block.push_str(&format!(
            "[{n}] {title}\nURL: {url}\n{resume}\n\n",
            n = i + 1,
            title = finding.title.as_deref().unwrap_or(""),
            url = finding.url.as_deref().unwrap_or(""),
            resume = finding.resume.as_deref().unwrap_or(""),
        ));
    }
    block
}

/// Render the numbered reference list: one `[i] - [title](url)` per line.
pub fn render_references(findings: &[Finding]) -> String {
    findings
        .iter()
        .enumerate()
        .map(|(i, finding)| {
            format!(
                "[{n}] - [{title}]({url})",
                n = i + 1,
                title = finding.title.as_deref().unwrap_or(""),
                url = finding.url.as_deref().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
