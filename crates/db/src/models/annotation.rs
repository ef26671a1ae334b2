//! Annotation snapshot rows.

use reckoner_core::error::CoreError;
use reckoner_core::status::ImplementationStatus;
use reckoner_core::types::{DbId, Timestamp};
use reckoner_core::view::{FilteredView, ProjectedFields, ViewRow};
use sqlx::FromRow;

/// A row from the `annotation_snapshots` table.
#[derive(Debug, Clone, FromRow)]
pub struct AnnotationSnapshotHeader {
    pub name: String,
    pub checkout_column: String,
    pub vertical_column: String,
    pub comments_enabled: bool,
    pub saved_at: Timestamp,
}

/// A row from the `annotation_rows` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AnnotationRowRecord {
    pub position: i64,
    pub reckoner_id: Option<DbId>,
    pub method: String,
    pub feature_name: String,
    pub availability: String,
    pub checkout_support: String,
    pub vertical_support: String,
    pub status: String,
    pub comments: Option<String>,
}

impl AnnotationRowRecord {
    pub fn from_view_row(position: usize, row: &ViewRow) -> Self {
        let fields = row.fields();
        Self {
            position: position as i64,
            reckoner_id: fields.reckoner_id,
            method: fields.method.clone(),
            feature_name: fields.feature_name.clone(),
            availability: fields.availability.clone(),
            checkout_support: fields.checkout_support.clone(),
            vertical_support: fields.vertical_support.clone(),
            status: row.status().as_str().to_string(),
            comments: row.comments().map(str::to_string),
        }
    }

    pub fn into_view_row(self) -> Result<ViewRow, CoreError> {
        let status = ImplementationStatus::from_str(&self.status)?;
        Ok(ViewRow::new(
            ProjectedFields {
                reckoner_id: self.reckoner_id,
                method: self.method,
                feature_name: self.feature_name,
                availability: self.availability,
                checkout_support: self.checkout_support,
                vertical_support: self.vertical_support,
            },
            status,
            self.comments,
        ))
    }
}

/// Rebuild a view from its stored header and rows (rows in position order).
pub fn assemble_view(
    header: AnnotationSnapshotHeader,
    rows: Vec<AnnotationRowRecord>,
) -> Result<FilteredView, CoreError> {
    let rows = rows
        .into_iter()
        .map(AnnotationRowRecord::into_view_row)
        .collect::<Result<Vec<_>, _>>()?;
    FilteredView::new(
        header.checkout_column,
        header.vertical_column,
        header.comments_enabled,
        rows,
    )
}
