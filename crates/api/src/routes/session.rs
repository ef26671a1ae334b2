use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/session`.
///
/// ```text
/// GET    /               get_session
/// POST   /filter         apply_filter
/// PATCH  /rows/{index}   edit_row
/// POST   /save           save_view
/// POST   /acknowledge    acknowledge_save
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::get_session))
        .route("/filter", post(session::apply_filter))
        .route("/rows/{index}", patch(session::edit_row))
        .route("/save", post(session::save_view))
        .route("/acknowledge", post(session::acknowledge_save))
}
