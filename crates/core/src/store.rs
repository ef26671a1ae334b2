//! Seams between the domain and its storage backends.
//!
//! File-backed implementations live in this crate; SQLite-backed ones live
//! in `reckoner_db`.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::feature_flag::FeatureFlagRecord;
use crate::table::FeatureTable;
use crate::types::{DbId, Timestamp};
use crate::view::FilteredView;

/// Produces the full reckoner with the method column forward-filled.
#[async_trait]
pub trait FeatureTableSource: Send + Sync {
    async fn load_feature_table(&self) -> Result<FeatureTable, CoreError>;
}

/// Persists the last saved view under one logical name.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Replace the stored snapshot with `view`, recorded as saved at
    /// `saved_at`. A failed save leaves the previous snapshot readable.
    async fn save(&self, view: &FilteredView, saved_at: Timestamp) -> Result<(), CoreError>;

    /// The stored snapshot, or `None` when nothing was ever saved.
    async fn load(&self) -> Result<Option<FilteredView>, CoreError>;
}

/// Per-row lookup into the feature-flag side table.
#[async_trait]
pub trait FeatureFlagLookup: Send + Sync {
    async fn lookup(&self, reckoner_id: DbId) -> Result<Option<FeatureFlagRecord>, CoreError>;
}
