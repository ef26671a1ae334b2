//! Feature-flag side data attached to "Feature Request" rows.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlagRecord {
    pub reckoner_id: DbId,
    pub flags: Vec<String>,
    pub description: String,
}

/// Decode the stored flags column: a JSON array of strings. `None` (SQL
/// `NULL`) and empty text decode to no flags.
pub fn decode_flags(raw: Option<&str>) -> Result<Vec<String>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| {
            CoreError::MalformedData(format!("flags must be a JSON array of strings: {e}"))
        }),
    }
}
