//! Repository for the `annotation_snapshots` and `annotation_rows` tables.

use sqlx::SqlitePool;

use crate::models::annotation::{AnnotationRowRecord, AnnotationSnapshotHeader};

const HEADER_COLUMNS: &str = "name, checkout_column, vertical_column, comments_enabled, saved_at";

const ROW_COLUMNS: &str = "position, reckoner_id, method, feature_name, availability, \
    checkout_support, vertical_support, status, comments";

pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Replace the snapshot named `header.name` with `header` and `rows`.
    ///
    /// Runs in one transaction: either the whole new snapshot is visible or
    /// the previous one still is.
    pub async fn replace_snapshot(
        pool: &SqlitePool,
        header: &AnnotationSnapshotHeader,
        rows: &[AnnotationRowRecord],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM annotation_rows WHERE snapshot_name = ?1")
            .bind(&header.name)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM annotation_snapshots WHERE name = ?1")
            .bind(&header.name)
            .execute(&mut *tx)
            .await?;

        let insert_header = format!(
            "INSERT INTO annotation_snapshots ({HEADER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"
        );
        sqlx::query(&insert_header)
            .bind(&header.name)
            .bind(&header.checkout_column)
            .bind(&header.vertical_column)
            .bind(header.comments_enabled)
            .bind(header.saved_at)
            .execute(&mut *tx)
            .await?;

        let insert_row = format!(
            "INSERT INTO annotation_rows (snapshot_name, {ROW_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );
        for row in rows {
            sqlx::query(&insert_row)
                .bind(&header.name)
                .bind(row.position)
                .bind(row.reckoner_id)
                .bind(&row.method)
                .bind(&row.feature_name)
                .bind(&row.availability)
                .bind(&row.checkout_support)
                .bind(&row.vertical_support)
                .bind(&row.status)
                .bind(&row.comments)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    /// Find a snapshot header by name.
    pub async fn find_header(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<AnnotationSnapshotHeader>, sqlx::Error> {
        let query = format!("SELECT {HEADER_COLUMNS} FROM annotation_snapshots WHERE name = ?1");
        sqlx::query_as::<_, AnnotationSnapshotHeader>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Rows of a snapshot in position order.
    pub async fn list_rows(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Vec<AnnotationRowRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM annotation_rows WHERE snapshot_name = ?1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, AnnotationRowRecord>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }
}
