use tutorlens_core::analysis::AnalysisResult;
use tutorlens_core::types::DbId;

/// Terminal outcomes of a pipeline run that did not complete.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Video {id} not found")]
    NotFound { id: DbId },

    /// Operator fault such as a missing API key. Never triggers fallback.
    #[error("Analysis is not configured: {0}")]
    Configuration(String),

    /// Both the multimodal and the text-only call failed.
    #[error("Analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    /// Analysis succeeded but could not be stored. The result is handed back
    /// so the caller can still show it.
    #[error("Failed to save analysis: {reason}")]
    PersistFailed {
        analysis: Box<AnalysisResult>,
        reason: String,
    },

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}
