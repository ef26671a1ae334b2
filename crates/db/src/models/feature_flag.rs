//! Feature-flag side table rows.

use reckoner_core::error::CoreError;
use reckoner_core::feature_flag::{decode_flags, FeatureFlagRecord};
use reckoner_core::types::DbId;
use sqlx::FromRow;

/// A row from the `features` table.
#[derive(Debug, Clone, FromRow)]
pub struct FeatureFlagRow {
    pub id: DbId,
    pub reckoner_id: DbId,
    pub flags: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<FeatureFlagRow> for FeatureFlagRecord {
    type Error = CoreError;

    fn try_from(row: FeatureFlagRow) -> Result<Self, Self::Error> {
        Ok(FeatureFlagRecord {
            reckoner_id: row.reckoner_id,
            flags: decode_flags(row.flags.as_deref())?,
            description: row.description.unwrap_or_default(),
        })
    }
}
