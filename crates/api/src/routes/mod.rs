pub mod annotations;
pub mod feature_flags;
pub mod health;
pub mod reckoner;
pub mod reference;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reference                          cached reference sets (GET)
/// /reference/reload                   reload reference sets (POST)
///
/// /reckoner                           full feature table (GET)
/// /reckoner/reload                    reload feature table (POST)
///
/// /session                            current session (GET)
/// /session/filter                     run the filter (POST)
/// /session/rows/{index}               edit status / comments (PATCH)
/// /session/save                       persist the view (POST)
/// /session/acknowledge                clear the save confirmation (POST)
///
/// /annotations                        last saved snapshot (GET)
///
/// /feature-flags/{reckoner_id}        per-row feature flags (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reference", reference::router())
        .nest("/reckoner", reckoner::router())
        .nest("/session", session::router())
        .nest("/annotations", annotations::router())
        .nest("/feature-flags", feature_flags::router())
}
