//! Response envelope types shared by handlers.
//!
//! CRUD responses use a `{ "data": ... }` envelope. The analyze endpoint has
//! its own `{ success, video, analysis }` shape, see [`AnalyzeResponse`].

use serde::Serialize;
use tutorlens_core::analysis::AnalysisResult;
use tutorlens_db::models::video::Video;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Body of a successful `POST /api/v1/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub video: Video,
    pub analysis: AnalysisResult,
}

/// Body of `GET /api/v1/uploads/sign`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    /// Presigned PUT URL for the browser upload.
    pub upload_url: String,
    /// Permanent object URL to record once the upload finishes.
    pub file_url: String,
    pub object_key: String,
}
