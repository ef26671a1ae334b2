//! Handler for the optional per-row feature-flag lookup.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use reckoner_core::error::CoreError;
use reckoner_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Flags for one reckoner row. Both fields are `null` when the row has none.
#[derive(Debug, Serialize)]
pub struct FeatureFlagsResponse {
    pub reckoner_id: DbId,
    pub flags: Option<Vec<String>>,
    pub description: Option<String>,
}

/// GET /feature-flags/{reckoner_id}
pub async fn get_feature_flags(
    State(state): State<AppState>,
    Path(reckoner_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let Some(lookup) = state.backends.feature_flags.as_ref() else {
        return Err(CoreError::NotFound("Feature flag lookup".to_string()).into());
    };

    let data = match lookup.lookup(reckoner_id).await? {
        Some(record) => FeatureFlagsResponse {
            reckoner_id,
            flags: Some(record.flags),
            description: Some(record.description),
        },
        None => FeatureFlagsResponse {
            reckoner_id,
            flags: None,
            description: None,
        },
    };
    Ok(Json(DataResponse { data }))
}
