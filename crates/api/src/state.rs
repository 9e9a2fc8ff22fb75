use std::sync::Arc;

use tutorlens_pipeline::AnalysisPipeline;
use tutorlens_storage::ObjectStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tutorlens_db::DbPool,
    /// `None` when the `OSS_*` variables are absent; upload signing then
    /// fails and analysis runs text-only.
    pub storage: Option<Arc<ObjectStorage>>,
    pub pipeline: Arc<AnalysisPipeline>,
    /// Whether an inference API key is present, reported by `/health`.
    pub inference_configured: bool,
}
