//! Annotation snapshot kept as a single JSON document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::store::AnnotationStore;
use crate::types::Timestamp;
use crate::view::FilteredView;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    saved_at: Timestamp,
    view: &'a FilteredView,
}

#[derive(Deserialize)]
struct Snapshot {
    saved_at: Timestamp,
    view: FilteredView,
}

#[derive(Debug, Clone)]
pub struct JsonFileAnnotationStore {
    path: PathBuf,
}

impl JsonFileAnnotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "annotations".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_snapshot(&self) -> Result<Option<Snapshot>, CoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage("read", &self.path, e)),
        };
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| storage("decode", &self.path, e))?;
        snapshot
            .view
            .validate()
            .map_err(|e| storage("validate", &self.path, e))?;
        Ok(Some(snapshot))
    }
}

fn storage(action: &str, path: &Path, e: impl std::fmt::Display) -> CoreError {
    CoreError::Storage(format!("Failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl AnnotationStore for JsonFileAnnotationStore {
    async fn save(&self, view: &FilteredView, saved_at: Timestamp) -> Result<(), CoreError> {
        let body = serde_json::to_vec_pretty(&SnapshotRef { saved_at, view })
            .map_err(|e| storage("encode", &self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage("create", parent, e))?;
        }

        // Write a sibling then rename over the target; the target is never partial.
        let tmp = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp, &body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage("write", &tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage("replace", &self.path, e));
        }

        tracing::info!(
            path = %self.path.display(),
            rows = view.len(),
            %saved_at,
            "Annotation snapshot saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<FilteredView>, CoreError> {
        Ok(self.read_snapshot().await?.map(|snapshot| snapshot.view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, FilterCriteria, FilterOptions};
    use crate::status::ImplementationStatus;
    use crate::table::tests::sample_table;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn edited_view() -> FilteredView {
        let criteria = FilterCriteria {
            checkout_type: "Standard".into(),
            vertical_name: "Ecommerce".into(),
            methods: vec!["PayNow".into()],
        };
        let mut view = filter(&criteria, &sample_table(), FilterOptions { comments: true }).unwrap();
        view.set_status(0, ImplementationStatus::Implemented).unwrap();
        view.set_comments(1, "awaiting gateway support").unwrap();
        view
    }

    #[tokio::test]
    async fn load_before_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileAnnotationStore::new(dir.path().join("filtered_data.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fresh_instance_reads_saved_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("filtered_data.json");
        let view = edited_view();

        JsonFileAnnotationStore::new(&path).save(&view, Utc::now()).await.unwrap();
        let loaded = JsonFileAnnotationStore::new(&path).load().await.unwrap();
        assert_eq!(loaded, Some(view));
        assert!(!path.with_file_name("filtered_data.json.tmp").exists());
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileAnnotationStore::new(dir.path().join("filtered_data.json"));
        store.save(&edited_view(), Utc::now()).await.unwrap();

        let empty = FilteredView::new("Custom", "Lending", false, vec![]).unwrap();
        store.save(&empty, Utc::now()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(empty));
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.json");
        tokio::fs::write(&path, "{ truncated").await.unwrap();
        let err = JsonFileAnnotationStore::new(&path).load().await.unwrap_err();
        assert_matches!(err, CoreError::Storage(_));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.json");
        let store = JsonFileAnnotationStore::new(&path);
        let first = edited_view();
        store.save(&first, Utc::now()).await.unwrap();

        // A directory where the temp file goes makes the write fail.
        std::fs::create_dir(path.with_file_name("filtered_data.json.tmp")).unwrap();
        let replacement = FilteredView::new("Custom", "Lending", false, vec![]).unwrap();
        let err = store.save(&replacement, Utc::now()).await.unwrap_err();
        assert_matches!(err, CoreError::Storage(_));

        assert_eq!(store.load().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let store = JsonFileAnnotationStore::new(&path);
        let err = store.save(&edited_view(), Utc::now()).await.unwrap_err();
        assert_matches!(err, CoreError::Storage(_));
        assert!(!path.with_file_name("filtered_data.json.tmp").exists());
    }

    #[tokio::test]
    async fn snapshot_records_save_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileAnnotationStore::new(dir.path().join("filtered_data.json"));
        let saved_at = Utc.with_ymd_and_hms(2024, 8, 1, 12, 30, 0).unwrap();
        store.save(&edited_view(), saved_at).await.unwrap();

        let snapshot = store.read_snapshot().await.unwrap().unwrap();
        assert_eq!(snapshot.saved_at, saved_at);
    }
}
