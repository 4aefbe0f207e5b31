//! Orchestration graph — drives `start → plan → research×N → collect →
//! synthesize → end`.
//!
//! # Architecture
//!
//! ```text
//! User Question
//!       │
//!       ▼
//! ┌───────────┐
//! │   Plan    │  ← decomposes the question into N sub-queries
//! └──┬───┬────┘
//!    │   │        one task per sub-query (JoinSet fan-out)
//!    ▼   ▼
//! ┌─────┐ ┌─────┐
//! │ R-0 │ │ R-1 │ ...  ← isolated research branches
//! └──┬──┘ └──┬──┘
//!    ▼       ▼
//! ┌───────────┐
//! │  Collect  │  ← join-all barrier, findings sorted by branch index
//! └─────┬─────┘
//!       ▼
//! ┌───────────┐
//! │ Synthesize│  ← cited report (or deterministic fallback)
//! └───────────┘
//! ```
//!
//! Branches share nothing; their outputs carry the planning-order index so
//! citation numbering stays deterministic regardless of completion order.
//! A branch that panics degrades to a placeholder finding for its index —
//! the one-finding-per-query invariant holds unconditionally.

use std::sync::Arc;

use deepbrief_core::event::{EventBus, ProgressEvent};
use deepbrief_core::provider::CompletionProvider;
use deepbrief_core::search::SearchProvider;
use deepbrief_core::state::{Finding, ReportState};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::planner::QueryPlanner;
use crate::researcher::{self, Researcher};
use crate::synthesizer::Synthesizer;

/// The report-generation pipeline, wired once per process.
pub struct ReportGraph {
    planner: QueryPlanner,
    researcher: Arc<Researcher>,
    synthesizer: Synthesizer,
    events: Arc<EventBus>,
    max_queries: usize,
}

impl ReportGraph {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
        events: Arc<EventBus>,
        config: &deepbrief_config::AppConfig,
    ) -> Self {
        Self {
            planner: QueryPlanner::new(provider.clone(), events.clone(), config),
            researcher: Arc::new(Researcher::new(
                provider.clone(),
                search,
                events.clone(),
                config,
            )),
            synthesizer: Synthesizer::new(provider, events.clone(), config),
            events,
            max_queries: config.max_queries,
        }
    }

    /// Run one question through the full pipeline.
    ///
    /// The returned state always has `final_response` set; expected
    /// failures degrade stages rather than surfacing here. Only genuine
    /// wiring errors would propagate.
    pub async fn run(
        &self,
        user_input: &str,
        debug: bool,
    ) -> deepbrief_core::Result<ReportState> {
        let mut state = ReportState::new(user_input, debug);

        // ── Plan ──
        let mut queries = self.planner.plan(user_input).await;
        queries.truncate(self.max_queries);
        state.queries = queries.clone();

        self.events.publish(ProgressEvent::PlanReady {
            queries: queries.clone(),
        });
        info!(queries = queries.len(), "Plan ready, fanning out research");

        // ── Fan-out ──
        // Zero queries spawn zero tasks; the barrier below is then
        // trivially satisfied and the run proceeds to synthesis.
        let mut branches: JoinSet<(usize, Finding)> = JoinSet::new();
        for (index, query) in queries.iter().enumerate() {
            self.events.publish(ProgressEvent::ResearchStarted {
                index,
                query: query.clone(),
            });

            let researcher = self.researcher.clone();
            let query = query.clone();
            let input = user_input.to_string();
            branches.spawn(async move {
                let finding = researcher.research(index, &query, &input).await;
                (index, finding)
            });
        }

        // ── Collect (fan-in barrier) ──
        let mut collected: Vec<(usize, Finding)> = Vec::with_capacity(queries.len());
        while let Some(joined) = branches.join_next().await {
            match joined {
                Ok(pair) => collected.push(pair),
                Err(e) => warn!(error = %e, "Research branch aborted"),
            }
        }

        // A panicked branch left a hole; fill it with the placeholder
        // finding for its query so numbering stays aligned to the plan.
        if collected.len() < queries.len() {
            for (index, query) in queries.iter().enumerate() {
                if !collected.iter().any(|(i, _)| *i == index) {
                    let result = researcher::placeholder_result(query);
                    collected.push((
                        index,
                        Finding {
                            title: result.title,
                            url: result.url,
                            resume: None,
                        },
                    ));
                }
            }
        }

        // Pin citation numbering to planning order, not arrival order.
        collected.sort_unstable_by_key(|(index, _)| *index);
        state.merge_findings(collected.into_iter().map(|(_, finding)| finding));

        self.events.publish(ProgressEvent::Collected {
            count: state.queries_results.len(),
        });
        debug!(findings = state.queries_results.len(), "Fan-in complete");

        // ── Synthesize ──
        self.events.publish(ProgressEvent::SynthesisStarted {
            findings: state.queries_results.len(),
        });

        let report = self
            .synthesizer
            .synthesize(user_input, &state.queries_results)
            .await;

        self.events.publish(ProgressEvent::ReportReady {
            chars: report.len(),
        });
        state.final_response = Some(report);

        Ok(state)
    }
}
