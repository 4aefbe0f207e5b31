//! The shared report state threaded through the pipeline.
//!
//! `ReportState` is created once per invocation, mutated stage by stage,
//! and discarded after the final response is delivered. Fields written by
//! parallel research branches are combined with the explicit union-merge
//! operator on the state itself — never by overwriting.

use serde::{Deserialize, Serialize};

/// The structured result of researching one sub-query.
///
/// Immutable once constructed. Every field is optional: a finding produced
/// entirely from fallbacks still exists, it just carries less content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Display name of the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Source locator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Summarized content (may be empty on failure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
}

impl Finding {
    pub fn new(title: Option<String>, url: Option<String>, resume: Option<String>) -> Self {
        Self { title, url, resume }
    }
}

/// The single shared record for one report invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportState {
    /// The original question. Set once at graph entry, immutable after.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,

    /// Ordered sub-queries. Set once by the query planner.
    #[serde(default)]
    pub queries: Vec<String>,

    /// Findings contributed by parallel research branches.
    ///
    /// Combined across branches via [`ReportState::merge_findings`];
    /// invariant: `queries_results.len() <= queries.len()`.
    #[serde(default)]
    pub queries_results: Vec<Finding>,

    /// The terminal value. Set exactly once, by the synthesizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,

    /// Front-end verbosity flag. Not used by the core pipeline.
    #[serde(default)]
    pub debug: bool,
}

impl ReportState {
    /// Create the state for a new invocation.
    pub fn new(user_input: impl Into<String>, debug: bool) -> Self {
        Self {
            user_input: Some(user_input.into()),
            debug,
            ..Self::default()
        }
    }

    /// The declared combine operator for `queries_results`.
    ///
    /// Union-merge by concatenation: each branch's contribution is appended,
    /// never overwritten. The fan-in barrier calls this after sorting branch
    /// outputs by planning-order index, so citation numbering stays stable
    /// regardless of completion order.
    pub fn merge_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.queries_results.extend(findings);
    }
}
