use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reckoner;
use crate::state::AppState;

/// Routes mounted at `/reckoner`.
///
/// ```text
/// GET    /          get_feature_table
/// POST   /reload    reload_feature_table
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reckoner::get_feature_table))
        .route("/reload", post(reckoner::reload_feature_table))
}
