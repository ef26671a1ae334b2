//! Handlers for the static reference sets that drive the selectors.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /reference
pub async fn get_reference_sets(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sets = state.reference_sets().await?;
    Ok(Json(DataResponse { data: sets }))
}

/// POST /reference/reload
///
/// Re-read the reference sets. A failed reload keeps the cached sets.
pub async fn reload_reference_sets(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sets = state.reload_reference_sets().await?;
    tracing::info!(
        checkout_types = sets.checkout_types.len(),
        vertical_names = sets.vertical_names.len(),
        methods = sets.methods.len(),
        "Reference sets reloaded"
    );
    Ok(Json(DataResponse { data: sets }))
}
