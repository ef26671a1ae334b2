use axum::routing::get;
use axum::Router;

use crate::handlers::feature_flags;
use crate::state::AppState;

/// Routes mounted at `/feature-flags`.
///
/// ```text
/// GET    /{reckoner_id}    get_feature_flags
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{reckoner_id}", get(feature_flags::get_feature_flags))
}
