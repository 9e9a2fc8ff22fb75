//! Production implementations of the pipeline ports.

use async_trait::async_trait;
use sqlx::PgPool;
use tutorlens_core::analysis::AnalysisResult;
use tutorlens_core::types::DbId;
use tutorlens_db::models::video::Video;
use tutorlens_db::repositories::VideoRepo;
use tutorlens_inference::{DashScopeClient, InferenceError};
use tutorlens_storage::{ObjectStorage, SignRequest, StorageError};

use crate::ports::{AccessUrlProvider, TextAnalyzer, VideoAnalyzer, VideoStore};

/// [`VideoStore`] backed by the `videos` table.
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn find_video(&self, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        VideoRepo::find_by_id(&self.pool, id).await
    }

    async fn save_analysis(
        &self,
        id: DbId,
        analysis: &AnalysisResult,
    ) -> Result<Option<Video>, sqlx::Error> {
        let value = serde_json::to_value(analysis).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        VideoRepo::save_analysis(&self.pool, id, &value).await
    }
}

#[async_trait]
impl AccessUrlProvider for ObjectStorage {
    async fn sign(&self, object_key: &str, request: &SignRequest) -> Result<String, StorageError> {
        self.presign(object_key, request).await
    }
}

#[async_trait]
impl VideoAnalyzer for DashScopeClient {
    async fn analyze_video(
        &self,
        instruction: &str,
        video_url: &str,
    ) -> Result<String, InferenceError> {
        DashScopeClient::analyze_video(self, instruction, video_url).await
    }
}

#[async_trait]
impl TextAnalyzer for DashScopeClient {
    async fn analyze_text(&self, instruction: &str) -> Result<String, InferenceError> {
        DashScopeClient::analyze_text(self, instruction).await
    }
}

/// Stand-in used when object storage credentials are absent. Every signing
/// attempt fails, which sends analysis down the text-only path.
pub struct UnconfiguredStorage;

#[async_trait]
impl AccessUrlProvider for UnconfiguredStorage {
    async fn sign(&self, _object_key: &str, _request: &SignRequest) -> Result<String, StorageError> {
        Err(StorageError::MissingConfig("OSS_BUCKET"))
    }
}
