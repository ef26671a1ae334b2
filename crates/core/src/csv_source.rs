//! Feature table read from a delimited flat file.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::store::FeatureTableSource;
use crate::table::FeatureTable;

#[derive(Debug, Clone)]
pub struct CsvFeatureTableSource {
    path: PathBuf,
}

impl CsvFeatureTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeatureTableSource for CsvFeatureTableSource {
    async fn load_feature_table(&self) -> Result<FeatureTable, CoreError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                CoreError::NotFound(format!("Feature table file {}", self.path.display()))
            }
            _ => CoreError::Storage(format!("Failed to read {}: {e}", self.path.display())),
        })?;
        let table = parse_feature_csv(&bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.support_columns().len(),
            "Loaded feature table from CSV"
        );
        Ok(table)
    }
}

/// Parse CSV bytes (header row first) into a [`FeatureTable`].
pub fn parse_feature_csv(bytes: &[u8]) -> Result<FeatureTable, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let malformed = |e: csv::Error| CoreError::MalformedData(format!("CSV: {e}"));

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let records = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(|cell| Some(cell.to_string())).collect())
                .map_err(malformed)
        })
        .collect::<Result<Vec<Vec<Option<String>>>, _>>()?;

    FeatureTable::from_records(headers, records)
}
