//! Handlers for the full ready reckoner table.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /reckoner
pub async fn get_feature_table(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let table = state.feature_table().await?;
    Ok(Json(DataResponse { data: table }))
}

/// POST /reckoner/reload
pub async fn reload_feature_table(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let table = state.reload_feature_table().await?;
    tracing::info!(rows = table.len(), "Feature table reloaded");
    Ok(Json(DataResponse { data: table }))
}
