use axum::routing::get;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/sign", get(uploads::sign_upload))
}
