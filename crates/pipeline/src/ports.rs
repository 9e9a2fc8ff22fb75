//! Collaborator seams used by the pipeline.
//!
//! All traits are object-safe and `Send + Sync` so they can be held as
//! `Arc<dyn Trait>` inside a shared [`AnalysisPipeline`](crate::AnalysisPipeline).

use async_trait::async_trait;
use tutorlens_core::analysis::AnalysisResult;
use tutorlens_core::types::DbId;
use tutorlens_db::models::video::Video;
use tutorlens_inference::InferenceError;
use tutorlens_storage::{SignRequest, StorageError};

/// Durable video records.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn find_video(&self, id: DbId) -> Result<Option<Video>, sqlx::Error>;

    /// Store `analysis` on the record and mark it completed.
    ///
    /// Returns `None` when the row no longer exists.
    async fn save_analysis(
        &self,
        id: DbId,
        analysis: &AnalysisResult,
    ) -> Result<Option<Video>, sqlx::Error>;
}

/// Issues time-limited URLs for stored objects.
#[async_trait]
pub trait AccessUrlProvider: Send + Sync {
    async fn sign(&self, object_key: &str, request: &SignRequest) -> Result<String, StorageError>;
}

/// Multimodal model reviewing an actual video.
#[async_trait]
pub trait VideoAnalyzer: Send + Sync {
    async fn analyze_video(
        &self,
        instruction: &str,
        video_url: &str,
    ) -> Result<String, InferenceError>;
}

/// Text model reviewing from the instruction alone.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze_text(&self, instruction: &str) -> Result<String, InferenceError>;
}
