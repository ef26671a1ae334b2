use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /annotations
///
/// The last saved snapshot, or `null` when nothing has been saved.
pub async fn get_saved_annotations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let view = state.backends.annotations.load().await?;
    Ok(Json(DataResponse { data: view }))
}
