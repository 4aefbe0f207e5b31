//! The deepbrief research pipeline.
//!
//! Drives a question through `plan → research×N → collect → synthesize`:
//! the planner decomposes the question into sub-queries, one research
//! branch per sub-query runs search/extract/summarize concurrently, the
//! fan-in barrier collects one finding per branch, and the synthesizer
//! produces the cited final report.
//!
//! Every external call has a deterministic fallback; a run that reaches
//! the graph always ends with `final_response` set.

pub mod graph;
pub mod planner;
pub mod prompts;
pub mod researcher;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use graph::ReportGraph;
pub use planner::QueryPlanner;
pub use researcher::Researcher;
pub use synthesizer::Synthesizer;
