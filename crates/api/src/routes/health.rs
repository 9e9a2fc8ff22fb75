use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether an inference API key is set.
    pub inference_configured: bool,
    /// Whether object storage credentials are set.
    pub storage_configured: bool,
}

/// GET /health -- service, database and configuration status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = tutorlens_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        inference_configured: state.inference_configured,
        storage_configured: state.storage.is_some(),
    })
}

/// Mount health check routes (root-level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
