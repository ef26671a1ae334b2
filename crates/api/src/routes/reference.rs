use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes mounted at `/reference`.
///
/// ```text
/// GET    /          get_reference_sets
/// POST   /reload    reload_reference_sets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reference::get_reference_sets))
        .route("/reload", post(reference::reload_reference_sets))
}
