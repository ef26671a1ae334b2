//! Implementation status values a user can assign to a filtered row.
//!
//! The labels double as the stored and wire representation, so they must
//! stay in sync with the `annotation_rows.status` column and any snapshots
//! already written by the JSON file store.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Label shown for a row nobody has assessed yet.
pub const UNSET_LABEL: &str = "Select";

/// All valid status labels, in the order the grid offers them.
pub const VALID_STATUS_LABELS: &[&str] = &[
    UNSET_LABEL,
    "Implemented",
    "Suggested",
    "Not Applicable",
    "Not Implemented",
];

/// Implementation status of a single feature for the selected merchant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplementationStatus {
    #[default]
    #[serde(rename = "Select", alias = "Unset")]
    Unset,
    Implemented,
    Suggested,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    #[serde(rename = "Not Implemented")]
    NotImplemented,
}

impl ImplementationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => UNSET_LABEL,
            Self::Implemented => "Implemented",
            Self::Suggested => "Suggested",
            Self::NotApplicable => "Not Applicable",
            Self::NotImplemented => "Not Implemented",
        }
    }

    /// Parse a status from its label. `"Unset"` is accepted for [`Self::Unset`].
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            UNSET_LABEL | "Unset" => Ok(Self::Unset),
            "Implemented" => Ok(Self::Implemented),
            "Suggested" => Ok(Self::Suggested),
            "Not Applicable" => Ok(Self::NotApplicable),
            "Not Implemented" => Ok(Self::NotImplemented),
            _ => Err(CoreError::Validation(format!(
                "Invalid implementation status '{s}'. Must be one of: {}",
                VALID_STATUS_LABELS.join(", ")
            ))),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl std::fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
