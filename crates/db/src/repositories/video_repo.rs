//! Repository for the `videos` table.

use sqlx::PgPool;
use tutorlens_core::types::DbId;
use tutorlens_core::video::VideoStatus;

use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoListQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, file_name, file_url, object_key, file_size, \
    duration, status, ai_analysis, feedback, upload_time, created_at, updated_at";

/// Provides CRUD operations for video records.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video record in `pending` status.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos
                (student_id, file_name, file_url, object_key, file_size, duration, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(&input.student_id)
            .bind(&input.file_name)
            .bind(&input.file_url)
            .bind(&input.object_key)
            .bind(input.file_size)
            .bind(input.duration)
            .bind(VideoStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a video by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List videos newest first, optionally restricted to one student.
    ///
    /// A `None` limit returns every matching row.
    pub async fn list(pool: &PgPool, filter: &VideoListQuery) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE ($1::TEXT IS NULL OR student_id = $1)
             ORDER BY upload_time DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(&filter.student_id)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Update feedback and/or status. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                feedback = COALESCE($2, feedback),
                status = COALESCE($3, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.feedback)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Attach an analysis result and mark the video `completed`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn save_analysis(
        pool: &PgPool,
        id: DbId,
        analysis: &serde_json::Value,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                ai_analysis = $2,
                status = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(analysis)
            .bind(VideoStatus::Completed.as_str())
            .fetch_optional(pool)
            .await?;

        if video.is_none() {
            tracing::warn!(video_id = id, "Analysis save matched no video row");
        }
        Ok(video)
    }
}
