//! Handlers for the `/videos` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tutorlens_core::error::CoreError;
use tutorlens_core::types::DbId;
use tutorlens_core::video::{VideoStatus, UNFILTERED_LIST_LIMIT};
use tutorlens_db::models::video::{CreateVideo, UpdateVideo, Video, VideoListQuery};
use tutorlens_db::repositories::VideoRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub student_id: Option<String>,
}

impl ListParams {
    /// Unfiltered listings are capped; a per-student listing is not.
    fn into_query(self) -> VideoListQuery {
        match self.student_id.filter(|s| !s.trim().is_empty()) {
            Some(student_id) => VideoListQuery {
                student_id: Some(student_id),
                limit: None,
            },
            None => VideoListQuery {
                student_id: None,
                limit: Some(UNFILTERED_LIST_LIMIT),
            },
        }
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Video",
        id,
    }
}

/// GET /api/v1/videos?student_id=
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Video>>>> {
    let videos = VideoRepo::list(&state.pool, &params.into_query()).await?;
    Ok(Json(DataResponse { data: videos }))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Video>>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video }))
}

/// POST /api/v1/videos
pub async fn create_video(
    State(state): State<AppState>,
    payload: Result<Json<CreateVideo>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Video>>)> {
    let Json(input) = payload?;
    if input.student_id.trim().is_empty() {
        return Err(CoreError::Validation("student_id must not be empty".into()).into());
    }
    if input.file_url.trim().is_empty() {
        return Err(CoreError::Validation("file_url must not be empty".into()).into());
    }

    let video = VideoRepo::create(&state.pool, &input).await?;
    tracing::info!(video_id = video.id, student_id = %video.student_id, "Video recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// PUT /api/v1/videos/{id}
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateVideo>, JsonRejection>,
) -> AppResult<Json<DataResponse<Video>>> {
    let Json(input) = payload?;
    if let Some(status) = &input.status {
        VideoStatus::from_name(status)?;
    }

    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video }))
}
