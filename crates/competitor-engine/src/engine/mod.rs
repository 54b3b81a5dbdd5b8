//! Analysis engine
//!
//! Coordinates validation, retrieval, peer discovery, scoring and ranking

pub mod orchestrator;
pub mod progress;
pub mod result;

pub use orchestrator::{AnalysisOrchestrator, normalize_symbol};
pub use progress::{NoopProgress, ProgressEvent, ProgressSink, Severity, Stage};
pub use result::{AnalysisResult, ScoredStock};
