//! Handler for presigned browser uploads.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tutorlens_core::video::{
    build_object_key, random_key_suffix, UPLOAD_CONTENT_TYPE, UPLOAD_URL_TTL_SECS,
};
use tutorlens_storage::{SignRequest, StorageError};

use crate::error::{AppError, AppResult};
use crate::response::UploadTicket;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignParams {
    #[serde(alias = "studentId")]
    pub student_id: Option<String>,
    #[serde(alias = "fileName")]
    pub file_name: Option<String>,
}

/// GET /api/v1/uploads/sign?student_id=&file_name=
///
/// `studentId` and `fileName` are accepted as aliases.
///
/// The returned PUT URL only accepts `Content-Type: video/mp4` and expires
/// after an hour. The caller records the video with `fileUrl` afterwards.
pub async fn sign_upload(
    State(state): State<AppState>,
    Query(params): Query<SignParams>,
) -> AppResult<Json<UploadTicket>> {
    let (Some(student_id), Some(file_name)) = (params.student_id, params.file_name) else {
        return Err(AppError::BadRequest(
            "student_id and file_name are required".into(),
        ));
    };

    let storage = state
        .storage
        .as_ref()
        .ok_or(StorageError::MissingConfig("OSS_BUCKET"))?;

    let object_key = build_object_key(
        &student_id,
        &file_name,
        chrono::Utc::now().timestamp_millis(),
        &random_key_suffix(),
    )?;

    let upload_url = storage
        .presign(
            &object_key,
            &SignRequest::put(
                Duration::from_secs(UPLOAD_URL_TTL_SECS),
                UPLOAD_CONTENT_TYPE,
            ),
        )
        .await?;

    tracing::info!(%object_key, %student_id, "Upload URL issued");
    Ok(Json(UploadTicket {
        upload_url,
        file_url: storage.object_url(&object_key),
        object_key,
    }))
}
