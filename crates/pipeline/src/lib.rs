//! Analysis orchestration for uploaded practice videos.
//!
//! [`AnalysisPipeline::run`] takes one [`AnalysisRequest`] through
//! fetch, analyze (multimodal with a single text-only fallback), parse and
//! persist. Every collaborator sits behind a trait in [`ports`] so the
//! pipeline can be driven by in-memory fakes; [`adapters`] wires the real
//! Postgres, object storage and DashScope implementations.
//!
//! [`AnalysisRequest`]: tutorlens_core::analysis::AnalysisRequest

pub mod adapters;
pub mod error;
pub mod orchestrator;
pub mod ports;

pub use adapters::{PgVideoStore, UnconfiguredStorage};
pub use error::PipelineError;
pub use orchestrator::{
    AnalysisAttempt, AnalysisFailure, AnalysisOutcome, AnalysisPipeline, AnalysisStage,
};
pub use ports::{AccessUrlProvider, TextAnalyzer, VideoAnalyzer, VideoStore};
