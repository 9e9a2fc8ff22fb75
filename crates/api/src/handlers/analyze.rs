//! Handler for `POST /api/v1/analyze`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tutorlens_core::analysis::{AnalysisRequest, VideoIssueNote};
use tutorlens_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::AnalyzeResponse;
use crate::state::AppState;

/// Request body. Every field is optional at the wire level so a missing
/// field yields a 400 with a message naming all required fields; type
/// errors surface through [`AppError::JsonBody`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub video_id: Option<DbId>,
    pub student_name: Option<String>,
    pub videos: Option<Vec<VideoIssueNote>>,
    pub date: Option<String>,
}

impl AnalyzeBody {
    fn into_request(self) -> AppResult<AnalysisRequest> {
        let (Some(video_id), Some(student_name), Some(videos), Some(date)) =
            (self.video_id, self.student_name, self.videos, self.date)
        else {
            return Err(AppError::BadRequest(
                "videoId, studentName, videos and date are required".into(),
            ));
        };
        Ok(AnalysisRequest::new(video_id, student_name, videos, date)?)
    }
}

/// POST /api/v1/analyze
pub async fn analyze_video(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeBody>, JsonRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let Json(body) = payload?;
    let request = body.into_request()?;
    tracing::info!(
        video_id = request.video_id,
        clips = request.issues.len(),
        "Analysis requested"
    );

    let outcome = state.pipeline.run(&request).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        video: outcome.video,
        analysis: outcome.analysis,
    }))
}
