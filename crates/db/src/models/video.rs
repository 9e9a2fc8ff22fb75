//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorlens_core::types::{DbId, Timestamp};

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub student_id: String,
    pub file_name: Option<String>,
    pub file_url: String,
    pub object_key: Option<String>,
    pub file_size: Option<i64>,
    pub duration: Option<f64>,
    /// One of `pending`, `uploaded`, `completed`.
    pub status: String,
    /// Serialized `AnalysisResult`, set by the analysis pipeline.
    pub ai_analysis: Option<serde_json::Value>,
    pub feedback: Option<String>,
    pub upload_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an uploaded video. Status starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub student_id: String,
    pub file_url: String,
    pub file_name: Option<String>,
    pub object_key: Option<String>,
    pub file_size: Option<i64>,
    pub duration: Option<f64>,
}

/// DTO for human feedback updates. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub feedback: Option<String>,
    pub status: Option<String>,
}

/// Filter for listing videos.
#[derive(Debug, Clone, Default)]
pub struct VideoListQuery {
    pub student_id: Option<String>,
    pub limit: Option<i64>,
}
