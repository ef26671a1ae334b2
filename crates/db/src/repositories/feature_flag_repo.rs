//! Repository for the `features` side table.

use reckoner_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::feature_flag::FeatureFlagRow;

const COLUMNS: &str = "id, reckoner_id, flags, description";

pub struct FeatureFlagRepo;

impl FeatureFlagRepo {
    /// The first flag record for a reckoner row, if any.
    pub async fn find_by_reckoner_id(
        pool: &SqlitePool,
        reckoner_id: DbId,
    ) -> Result<Option<FeatureFlagRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM features WHERE reckoner_id = ?1 ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, FeatureFlagRow>(&query)
            .bind(reckoner_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a flag record, returning its id.
    pub async fn create(
        pool: &SqlitePool,
        reckoner_id: DbId,
        flags_json: &str,
        description: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO features (reckoner_id, flags, description) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(reckoner_id)
        .bind(flags_json)
        .bind(description)
        .fetch_one(pool)
        .await
    }
}
