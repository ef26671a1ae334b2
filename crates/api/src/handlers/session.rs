//! Handlers for the single-user editing session.
//!
//! Each handler holds the session lock for its whole action. Transitions run
//! on a clone, and the shared session is only replaced once the action has
//! succeeded.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use reckoner_core::filter::{filter, FilterCriteria};
use reckoner_core::session::{RowEdit, Session};
use reckoner_core::types::Timestamp;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload returned by a successful save.
#[derive(Debug, Serialize)]
pub struct SaveReceipt {
    pub rows_saved: usize,
    pub saved_at: Timestamp,
    pub session: Session,
}

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = state.session.lock().await.clone();
    Ok(Json(DataResponse { data: session }))
}

/// POST /session/filter
///
/// Filter the cached reckoner and make the result the session's view.
/// Unsaved edits to the previous view are discarded.
pub async fn apply_filter(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> AppResult<impl IntoResponse> {
    let table = state.feature_table().await?;
    let view = filter(&criteria, &table, state.filter_options())?;

    tracing::info!(
        checkout_type = %criteria.checkout_type,
        vertical_name = %criteria.vertical_name,
        methods = criteria.methods.len(),
        rows = view.len(),
        "Filter applied"
    );

    let mut session = state.session.lock().await;
    let next = std::mem::take(&mut *session).apply_filter(view);
    *session = next;
    Ok(Json(DataResponse {
        data: session.clone(),
    }))
}

/// PATCH /session/rows/{index}
pub async fn edit_row(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(edit): Json<RowEdit>,
) -> AppResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let next = session.clone().edit_row(index, edit)?;
    *session = next;

    tracing::debug!(index, "Row edited");
    Ok(Json(DataResponse {
        data: session.clone(),
    }))
}

/// POST /session/save
///
/// Write the current view to the annotation store. On failure the session
/// keeps its unsaved edits.
pub async fn save_view(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let pending = session.clone().begin_save()?;

    let saved_at = chrono::Utc::now();
    state
        .backends
        .annotations
        .save(pending.view(), saved_at)
        .await?;

    let rows_saved = pending.view().len();
    *session = pending.commit(saved_at);

    tracing::info!(rows = rows_saved, "Session view saved");
    Ok(Json(DataResponse {
        data: SaveReceipt {
            rows_saved,
            saved_at,
            session: session.clone(),
        },
    }))
}

/// POST /session/acknowledge
pub async fn acknowledge_save(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let next = std::mem::take(&mut *session).acknowledge_save();
    *session = next;
    Ok(Json(DataResponse {
        data: session.clone(),
    }))
}
