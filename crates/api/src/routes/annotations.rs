use axum::routing::get;
use axum::Router;

use crate::handlers::annotations;
use crate::state::AppState;

/// Routes mounted at `/annotations`.
///
/// ```text
/// GET    /          get_saved_annotations
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(annotations::get_saved_annotations))
}
