//! Repository for the reckoner feature table.
//!
//! The table's column set is not fixed (one column per checkout type and
//! vertical), so rows are read positionally and every cell is rendered as
//! text regardless of the SQLite storage class it was written with.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool, TypeInfo, ValueRef};

use super::quote_ident;

pub struct ReckonerRepo;

impl ReckonerRepo {
    /// Column names of `table` in declaration order. Empty when the table
    /// does not exist.
    pub async fn column_names(pool: &SqlitePool, table: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(table)
            .fetch_all(pool)
            .await
    }

    /// Every row of `table` as text cells, one per entry of `columns`, in
    /// rowid order.
    pub async fn fetch_records(
        pool: &SqlitePool,
        table: &str,
        columns: &[String],
    ) -> Result<Vec<Vec<Option<String>>>, sqlx::Error> {
        let select_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {select_list} FROM {} ORDER BY rowid",
            quote_ident(table)
        );
        let rows = sqlx::query(&query).fetch_all(pool).await?;
        rows.iter()
            .map(|row| {
                (0..columns.len())
                    .map(|i| cell_text(row, i))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Render one cell as text. `NULL` becomes `None`.
fn cell_text(row: &SqliteRow, index: usize) -> Result<Option<String>, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(None);
    }
    let storage_class = raw.type_info().name().to_ascii_uppercase();
    let text = match storage_class.as_str() {
        "INTEGER" => row.try_get::<i64, _>(index)?.to_string(),
        "REAL" => row.try_get::<f64, _>(index)?.to_string(),
        "BLOB" => String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(index)?).into_owned(),
        _ => row.try_get::<String, _>(index)?,
    };
    Ok(Some(text))
}
