//! Static reference sets offered by the selectors: checkout types, vertical
//! names and payment methods.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// JSON key holding the checkout types.
pub const CHECKOUT_TYPES_KEY: &str = "checkout_types";
/// JSON key holding the vertical names.
pub const VERTICAL_NAMES_KEY: &str = "vertical_names";
/// JSON key holding the payment methods.
pub const METHODS_KEY: &str = "methods";

/// The three fixed enumerations, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSets {
    pub checkout_types: Vec<String>,
    pub vertical_names: Vec<String>,
    pub methods: Vec<String>,
}

/// Anything that can produce the reference sets.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn load_reference_sets(&self) -> Result<ReferenceSets, CoreError>;
}

/// Reference sets stored as JSON documents.
#[derive(Debug, Clone)]
pub enum JsonReferenceSource {
    /// A single document carrying all three keys.
    Combined(PathBuf),
    /// One document per key.
    Split {
        checkout_types: PathBuf,
        vertical_names: PathBuf,
        methods: PathBuf,
    },
}

impl JsonReferenceSource {
    /// The split layout under `dir`: `checkout_types.json`,
    /// `vertical_names.json` and `methods.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::Split {
            checkout_types: dir.join(format!("{CHECKOUT_TYPES_KEY}.json")),
            vertical_names: dir.join(format!("{VERTICAL_NAMES_KEY}.json")),
            methods: dir.join(format!("{METHODS_KEY}.json")),
        }
    }
}

#[async_trait]
impl ReferenceSource for JsonReferenceSource {
    async fn load_reference_sets(&self) -> Result<ReferenceSets, CoreError> {
        let sets = match self {
            Self::Combined(path) => {
                let doc = read_json(path).await?;
                ReferenceSets {
                    checkout_types: string_list(&doc, CHECKOUT_TYPES_KEY, path)?,
                    vertical_names: string_list(&doc, VERTICAL_NAMES_KEY, path)?,
                    methods: string_list(&doc, METHODS_KEY, path)?,
                }
            }
            Self::Split {
                checkout_types,
                vertical_names,
                methods,
            } => ReferenceSets {
                checkout_types: string_list(
                    &read_json(checkout_types).await?,
                    CHECKOUT_TYPES_KEY,
                    checkout_types,
                )?,
                vertical_names: string_list(
                    &read_json(vertical_names).await?,
                    VERTICAL_NAMES_KEY,
                    vertical_names,
                )?,
                methods: string_list(&read_json(methods).await?, METHODS_KEY, methods)?,
            },
        };
        tracing::debug!(
            checkout_types = sets.checkout_types.len(),
            vertical_names = sets.vertical_names.len(),
            methods = sets.methods.len(),
            "Loaded reference sets from JSON"
        );
        Ok(sets)
    }
}

async fn read_json(path: &Path) -> Result<serde_json::Value, CoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CoreError::NotFound(format!("Reference file {}", path.display()))
        }
        _ => CoreError::Storage(format!("Failed to read {}: {e}", path.display())),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::MalformedData(format!("{}: {e}", path.display())))
}

/// Extract `key` from `doc` as an ordered list of strings.
pub fn string_list(
    doc: &serde_json::Value,
    key: &str,
    origin: &Path,
) -> Result<Vec<String>, CoreError> {
    let items = doc.get(key).and_then(|v| v.as_array()).ok_or_else(|| {
        CoreError::MalformedData(format!(
            "{}: expected key '{key}' holding an array",
            origin.display()
        ))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                CoreError::MalformedData(format!(
                    "{}: '{key}' must contain only strings, found {item}",
                    origin.display()
                ))
            })
        })
        .collect()
}
