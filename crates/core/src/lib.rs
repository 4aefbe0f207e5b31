//! # deepbrief Core
//!
//! Domain types, traits, and error definitions for the deepbrief
//! research-report generator. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators — the completion service and the search
//! service — are defined as traits here. Implementations live in their
//! respective crates. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod provider;
pub mod search;
pub mod state;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use event::{EventBus, ProgressEvent, Stage};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse};
pub use search::{SearchProvider, SearchResult};
pub use state::{Finding, ReportState};
