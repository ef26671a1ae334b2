//! SQLite-backed implementations of the `reckoner_core` source and store
//! traits.

use async_trait::async_trait;
use reckoner_core::error::CoreError;
use reckoner_core::feature_flag::FeatureFlagRecord;
use reckoner_core::reference::{ReferenceSets, ReferenceSource};
use reckoner_core::store::{AnnotationStore, FeatureFlagLookup, FeatureTableSource};
use reckoner_core::table::FeatureTable;
use reckoner_core::types::{DbId, Timestamp};
use reckoner_core::view::FilteredView;

use crate::models::annotation::{assemble_view, AnnotationRowRecord, AnnotationSnapshotHeader};
use crate::repositories::{
    is_missing_table, AnnotationRepo, FeatureFlagRepo, ReckonerRepo, ReferenceRepo,
};
use crate::DbPool;

/// Default name of the reckoner table written by the import job.
pub const DEFAULT_RECKONER_TABLE: &str = "reckoner";

/// Default snapshot name for saved annotations.
pub const DEFAULT_SNAPSHOT_NAME: &str = "filtered_data";

fn load_error(what: &str, err: sqlx::Error) -> CoreError {
    if is_missing_table(&err) {
        return CoreError::NotFound(format!("{what} table"));
    }
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            CoreError::MalformedData(format!("{what}: {err}"))
        }
        other => CoreError::Storage(format!("{what}: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Reference sets
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SqliteReferenceSource {
    pool: DbPool,
}

impl SqliteReferenceSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceSource for SqliteReferenceSource {
    async fn load_reference_sets(&self) -> Result<ReferenceSets, CoreError> {
        let checkout_types = ReferenceRepo::list_checkout_types(&self.pool)
            .await
            .map_err(|e| load_error("checkout_types", e))?;
        let vertical_names = ReferenceRepo::list_vertical_names(&self.pool)
            .await
            .map_err(|e| load_error("vertical_names", e))?;
        let methods = ReferenceRepo::list_methods(&self.pool)
            .await
            .map_err(|e| load_error("methods", e))?;

        tracing::debug!(
            checkout_types = checkout_types.len(),
            vertical_names = vertical_names.len(),
            methods = methods.len(),
            "Loaded reference sets from SQLite"
        );
        Ok(ReferenceSets {
            checkout_types,
            vertical_names,
            methods,
        })
    }
}

// ---------------------------------------------------------------------------
// Feature table
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SqliteFeatureTableSource {
    pool: DbPool,
    table: String,
}

impl SqliteFeatureTableSource {
    pub fn new(pool: DbPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl FeatureTableSource for SqliteFeatureTableSource {
    async fn load_feature_table(&self) -> Result<FeatureTable, CoreError> {
        let columns = ReckonerRepo::column_names(&self.pool, &self.table)
            .await
            .map_err(|e| load_error(&self.table, e))?;
        if columns.is_empty() {
            return Err(CoreError::NotFound(format!("{} table", self.table)));
        }

        let records = ReckonerRepo::fetch_records(&self.pool, &self.table, &columns)
            .await
            .map_err(|e| load_error(&self.table, e))?;
        let table = FeatureTable::from_records(columns, records)?;

        tracing::debug!(
            table = %self.table,
            rows = table.len(),
            columns = table.support_columns().len(),
            "Loaded feature table from SQLite"
        );
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Annotation snapshots
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SqliteAnnotationStore {
    pool: DbPool,
    name: String,
}

impl SqliteAnnotationStore {
    pub fn new(pool: DbPool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn storage_error(action: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::Storage(format!("Failed to {action} annotation snapshot: {err}"))
}

#[async_trait]
impl AnnotationStore for SqliteAnnotationStore {
    async fn save(&self, view: &FilteredView, saved_at: Timestamp) -> Result<(), CoreError> {
        let header = AnnotationSnapshotHeader {
            name: self.name.clone(),
            checkout_column: view.checkout_column().to_string(),
            vertical_column: view.vertical_column().to_string(),
            comments_enabled: view.comments_enabled(),
            saved_at,
        };
        let rows: Vec<AnnotationRowRecord> = view
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| AnnotationRowRecord::from_view_row(i, row))
            .collect();

        AnnotationRepo::replace_snapshot(&self.pool, &header, &rows)
            .await
            .map_err(|e| storage_error("save", e))?;

        tracing::info!(snapshot = %self.name, rows = rows.len(), "Annotation snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<FilteredView>, CoreError> {
        let Some(header) = AnnotationRepo::find_header(&self.pool, &self.name)
            .await
            .map_err(|e| storage_error("load", e))?
        else {
            return Ok(None);
        };
        let rows = AnnotationRepo::list_rows(&self.pool, &self.name)
            .await
            .map_err(|e| storage_error("load", e))?;
        let view = assemble_view(header, rows).map_err(|e| storage_error("decode", e))?;
        Ok(Some(view))
    }
}

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SqliteFeatureFlagLookup {
    pool: DbPool,
}

impl SqliteFeatureFlagLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureFlagLookup for SqliteFeatureFlagLookup {
    async fn lookup(&self, reckoner_id: DbId) -> Result<Option<FeatureFlagRecord>, CoreError> {
        let row = FeatureFlagRepo::find_by_reckoner_id(&self.pool, reckoner_id)
            .await
            .map_err(|e| load_error("features", e))?;
        row.map(FeatureFlagRecord::try_from).transpose()
    }
}
