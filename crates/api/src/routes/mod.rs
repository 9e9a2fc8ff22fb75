pub mod analyze;
pub mod health;
pub mod uploads;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// POST /analyze                   run the analysis pipeline
///
/// GET  /videos                    list (?student_id=)
/// POST /videos                    record an uploaded video
/// GET  /videos/{id}               fetch one
/// PUT  /videos/{id}               update feedback / status
///
/// GET  /uploads/sign              presigned PUT URL
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(analyze::router())
        .nest("/videos", videos::router())
        .nest("/uploads", uploads::router())
}
