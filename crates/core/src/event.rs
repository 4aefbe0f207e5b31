//! Pipeline progress events — decoupled communication with the front-end.
//!
//! Events are published as the orchestration graph moves through its
//! stages. The front-end subscribes to render progress; nothing in the
//! pipeline depends on anyone listening, and publishing can never fail the
//! operation it is observing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// The stages of the orchestration graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Plan,
    Research,
    Collect,
    Synthesize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Plan => "plan",
            Stage::Research => "research",
            Stage::Collect => "collect",
            Stage::Synthesize => "synthesize",
        };
        f.write_str(name)
    }
}

/// All progress events emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// The query planner produced a plan
    PlanReady { queries: Vec<String> },

    /// A research branch started
    ResearchStarted { index: usize, query: String },

    /// A research branch produced its finding
    FindingReady {
        index: usize,
        title: Option<String>,
        url: Option<String>,
    },

    /// All branches joined at the fan-in barrier
    Collected { count: usize },

    /// Final synthesis started
    SynthesisStarted { findings: usize },

    /// The final report is available
    ReportReady { chars: usize },

    /// A stage degraded to its fallback path
    FallbackUsed { stage: Stage, reason: String },
}

/// A broadcast-based bus for progress events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Send errors
/// (no subscribers) are discarded — observation must never fail the
/// pipeline.
pub struct EventBus {
    sender: broadcast::Sender<Arc<ProgressEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: ProgressEvent) {
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ProgressEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(ProgressEvent::ResearchStarted {
            index: 0,
            query: "rust ownership".into(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            ProgressEvent::ResearchStarted { index, query } => {
                assert_eq!(*index, 0);
                assert_eq!(query, "rust ownership");
            }
            _ => panic!("Expected ResearchStarted event"),
        }
    }

    #[test]
    fn publish_without_subscribers_doesnt_panic() {
        let bus = EventBus::default();
        bus.publish(ProgressEvent::Collected { count: 3 });
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Plan.to_string(), "plan");
        assert_eq!(Stage::Synthesize.to_string(), "synthesize");
    }
}
