use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tutorlens_core::error::CoreError;
use tutorlens_pipeline::PipelineError;
use tutorlens_storage::StorageError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of each crate and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{ error, code }` JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A body that is not JSON or does not match the expected shape.
    #[error("Invalid JSON body: {0}")]
    JsonBody(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A persistence failure still returns the computed analysis.
        if let AppError::Pipeline(PipelineError::PersistFailed { analysis, reason }) = self {
            tracing::error!(error = %reason, "Analysis computed but not saved");
            let body = json!({
                "error": "Analysis completed but could not be saved",
                "code": "PERSIST_FAILED",
                "analysis": analysis,
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Pipeline outcomes ---
            AppError::Pipeline(err) => match err {
                PipelineError::NotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Video with id {id} not found"),
                ),
                PipelineError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Analysis misconfigured");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        "Analysis service is not configured".to_string(),
                    )
                }
                PipelineError::AnalysisUnavailable(msg) => {
                    tracing::error!(error = %msg, "Analysis unavailable");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ANALYSIS_UNAVAILABLE",
                        "Analysis service is unavailable".to_string(),
                    )
                }
                PipelineError::Store(err) => classify_sqlx_error(err),
                PipelineError::PersistFailed { .. } => internal(),
            },

            // --- Storage errors ---
            AppError::Storage(err) => match err {
                StorageError::InvalidKey(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                StorageError::MissingConfig(var) => {
                    tracing::error!(var, "Object storage is not configured");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        "Object storage is not configured".to_string(),
                    )
                }
                StorageError::Presign(msg) => {
                    tracing::error!(error = %msg, "Presigning failed");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::JsonBody(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// `RowNotFound` maps to 404; everything else to a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
