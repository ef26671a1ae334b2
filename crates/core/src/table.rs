//! The canonical feature reckoner table: one row per method × feature.
//!
//! Tables are built from a header row plus raw records, regardless of
//! whether those came from a CSV file or a SQLite table. Construction
//! resolves the required columns by normalized header name and forward-fills
//! the `Method` column over the whole table, so every later consumer
//! (filtering, display) sees the resolved method groups.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Canonical header of the method column.
pub const METHOD_COLUMN: &str = "Method";

/// Canonical header of the feature name column. Sources spell it
/// `"Name of the  Feature"` or `Name_of_the_Feature`; both normalize to this.
pub const FEATURE_NAME_COLUMN: &str = "Name of the Feature";

/// Canonical header of the availability column.
pub const AVAILABILITY_COLUMN: &str = "Availability";

/// Optional surrogate key column referenced by the feature-flag side table.
pub const ID_COLUMN: &str = "id";

/// Availability value that marks a row as having feature-flag side data.
pub const FEATURE_REQUEST: &str = "Feature Request";

const REQUIRED_COLUMNS: [&str; 3] = [METHOD_COLUMN, FEATURE_NAME_COLUMN, AVAILABILITY_COLUMN];

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

/// Normalize a header for comparison.
///
/// Underscores become spaces, whitespace runs collapse to a single space and
/// the result is lowercased.
pub fn normalize_column_name(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A cell is blank when it is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Replace every blank value with the nearest preceding non-blank value.
///
/// Blank values before the first non-blank one become empty strings.
pub fn forward_fill(values: &mut [String]) {
    let mut last: Option<String> = None;
    for value in values.iter_mut() {
        if is_blank(value) {
            match &last {
                Some(prev) => value.clone_from(prev),
                None => value.clear(),
            }
        } else {
            last = Some(value.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Rows and tables
// ---------------------------------------------------------------------------

/// One record of the reckoner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    id: Option<DbId>,
    method: String,
    feature_name: String,
    availability: String,
    support: IndexMap<String, String>,
}

impl FeatureRow {
    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    pub fn availability(&self) -> &str {
        &self.availability
    }

    /// Support indicator for a checkout-type or vertical column, keyed by the
    /// header text as the source spelled it.
    pub fn support(&self, column: &str) -> Option<&str> {
        self.support.get(column).map(String::as_str)
    }

    pub fn support_cells(&self) -> &IndexMap<String, String> {
        &self.support
    }
}

/// The full reckoner, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureTable {
    support_columns: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Build a table from a header row and raw records.
    ///
    /// `None` cells (SQL `NULL`) are treated as blank. Fails with
    /// [`CoreError::Schema`] listing every required column that is absent.
    pub fn from_records(
        headers: Vec<String>,
        records: Vec<Vec<Option<String>>>,
    ) -> Result<Self, CoreError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_column_name(h)).collect();

        for (i, name) in normalized.iter().enumerate() {
            if normalized[..i].contains(name) {
                return Err(CoreError::MalformedData(format!(
                    "Duplicate column '{}'",
                    headers[i].trim()
                )));
            }
        }

        let position = |canonical: &str| {
            let wanted = normalize_column_name(canonical);
            normalized.iter().position(|n| *n == wanted)
        };

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| position(c).is_none())
            .collect();
        let (Some(method_idx), Some(name_idx), Some(avail_idx)) = (
            position(METHOD_COLUMN),
            position(FEATURE_NAME_COLUMN),
            position(AVAILABILITY_COLUMN),
        ) else {
            return Err(CoreError::missing_columns(missing));
        };
        let id_idx = position(ID_COLUMN);

        let support_idx: Vec<usize> = (0..headers.len())
            .filter(|i| ![Some(method_idx), Some(name_idx), Some(avail_idx), id_idx].contains(&Some(*i)))
            .collect();
        let support_columns: Vec<String> = support_idx
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();

        let mut records = records;
        for (n, record) in records.iter().enumerate() {
            if record.len() != headers.len() {
                return Err(CoreError::MalformedData(format!(
                    "Row {} has {} cells, expected {}",
                    n + 1,
                    record.len(),
                    headers.len()
                )));
            }
        }

        let mut methods: Vec<String> = records
            .iter_mut()
            .map(|r| r[method_idx].take().unwrap_or_default())
            .collect();
        forward_fill(&mut methods);

        let mut rows = Vec::with_capacity(records.len());
        for (n, (mut record, method)) in records.into_iter().zip(methods).enumerate() {
            let id = match id_idx {
                Some(i) => parse_id(record[i].as_deref(), n + 1)?,
                None => None,
            };
            let support = support_idx
                .iter()
                .zip(&support_columns)
                .map(|(&i, column)| (column.clone(), record[i].take().unwrap_or_default()))
                .collect();
            rows.push(FeatureRow {
                id,
                method,
                feature_name: record[name_idx].take().unwrap_or_default(),
                availability: record[avail_idx].take().unwrap_or_default(),
                support,
            });
        }

        Ok(Self {
            support_columns,
            rows,
        })
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Checkout-type and vertical headers, in source order.
    pub fn support_columns(&self) -> &[String] {
        &self.support_columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the support column matching `requested` by normalized name.
    pub fn resolve_support_column(&self, requested: &str) -> Option<&str> {
        let wanted = normalize_column_name(requested);
        self.support_columns
            .iter()
            .find(|c| normalize_column_name(c) == wanted)
            .map(String::as_str)
    }
}

fn parse_id(cell: Option<&str>, row: usize) -> Result<Option<DbId>, CoreError> {
    let Some(raw) = cell.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(id) = raw.parse::<DbId>() {
        return Ok(Some(id));
    }
    // SQLite imports sometimes store integer keys as REAL ("7.0").
    // `DbId::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    match raw.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= DbId::MIN as f64 && f < DbId::MAX as f64 => {
            Ok(Some(f as DbId))
        }
        Ok(f) if f.fract() == 0.0 => Err(CoreError::MalformedData(format!(
            "Row {row} has an out-of-range id '{raw}'"
        ))),
        _ => Err(CoreError::MalformedData(format!(
            "Row {row} has a non-integer id '{raw}'"
        ))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    /// The three-row reckoner used across the crate's tests.
    pub(crate) fn sample_table() -> FeatureTable {
        let headers = ["Method", "Name of the  Feature", "Availability", "Standard", "Ecommerce"]
            .map(String::from)
            .to_vec();
        FeatureTable::from_records(
            headers,
            vec![
                cells(&["PayNow", "Retry", "a", "x", "y"]),
                cells(&["", "Timeout", "a", "x", "y"]),
                cells(&["Wallet", "Retry", "b", "p", "q"]),
            ],
        )
        .unwrap()
    }

    // -- normalize_column_name ---------------------------------------------

    #[test]
    fn feature_name_spellings_normalize_together() {
        let a = normalize_column_name("Name of the  Feature");
        let b = normalize_column_name("Name_of_the_Feature");
        assert_eq!(a, "name of the feature");
        assert_eq!(a, b);
    }

    #[test]
    fn normalize_trims_outer_whitespace() {
        assert_eq!(normalize_column_name("  S2S "), "s2s");
    }

    // -- forward_fill ------------------------------------------------------

    #[test]
    fn forward_fill_takes_nearest_prior_value() {
        let mut values = ["A", "", "  ", "B", ""].map(String::from).to_vec();
        forward_fill(&mut values);
        assert_eq!(values, ["A", "A", "A", "B", "B"]);
    }

    #[test]
    fn forward_fill_is_idempotent() {
        let mut values = ["", "A", "", "B"].map(String::from).to_vec();
        forward_fill(&mut values);
        let once = values.clone();
        forward_fill(&mut values);
        assert_eq!(values, once);
    }

    #[test]
    fn forward_fill_leaves_leading_blanks_empty() {
        let mut values = [" ", "A"].map(String::from).to_vec();
        forward_fill(&mut values);
        assert_eq!(values, ["", "A"]);
    }

    // -- FeatureTable::from_records ----------------------------------------

    #[test]
    fn blank_method_inherits_previous_group() {
        let table = sample_table();
        let methods: Vec<&str> = table.rows().iter().map(FeatureRow::method).collect();
        assert_eq!(methods, ["PayNow", "PayNow", "Wallet"]);
    }

    #[test]
    fn null_method_treated_as_blank() {
        let headers = ["Method", "Name_of_the_Feature", "Availability"].map(String::from).to_vec();
        let table = FeatureTable::from_records(
            headers,
            vec![cells(&["UPI", "Intent", "Live"]), vec![None, Some("Collect".into()), None]],
        )
        .unwrap();
        assert_eq!(table.rows()[1].method(), "UPI");
        assert_eq!(table.rows()[1].availability(), "");
    }

    #[test]
    fn support_columns_keep_source_order_and_spelling() {
        let table = sample_table();
        assert_eq!(table.support_columns(), ["Standard", "Ecommerce"]);
        assert_eq!(table.rows()[2].support("Ecommerce"), Some("q"));
    }

    #[test]
    fn missing_required_columns_enumerated() {
        let headers = ["Method", "Standard"].map(String::from).to_vec();
        let err = FeatureTable::from_records(headers, vec![]).unwrap_err();
        assert_matches!(err, CoreError::Schema { missing } => {
            assert_eq!(missing, vec!["Name of the Feature", "Availability"]);
        });
    }

    #[test]
    fn duplicate_normalized_header_rejected() {
        let headers = ["Method", "Name of the Feature", "Name_of_the_Feature", "Availability"]
            .map(String::from)
            .to_vec();
        let err = FeatureTable::from_records(headers, vec![]).unwrap_err();
        assert_matches!(err, CoreError::MalformedData(_));
    }

    #[test]
    fn out_of_range_real_id_rejected() {
        let headers = ["id", "Method", "Name of the Feature", "Availability"].map(String::from).to_vec();
        for raw in ["1e20", "-1e20", "9223372036854775808.0", "inf"] {
            let err = FeatureTable::from_records(
                headers.clone(),
                vec![cells(&[raw, "UPI", "Intent", "Live"])],
            )
            .unwrap_err();
            assert_matches!(err, CoreError::MalformedData(msg) => assert!(msg.contains(raw)));
        }

        let table = FeatureTable::from_records(headers, vec![cells(&["-3.0", "UPI", "Intent", "Live"])])
            .unwrap();
        assert_eq!(table.rows()[0].id(), Some(-3));
    }

    #[test]
    fn ragged_record_rejected() {
        let headers = ["Method", "Name of the Feature", "Availability"].map(String::from).to_vec();
        let err = FeatureTable::from_records(headers, vec![cells(&["UPI", "Intent"])]).unwrap_err();
        assert_matches!(err, CoreError::MalformedData(msg) => assert!(msg.contains("Row 1")));
    }

    #[test]
    fn id_column_parsed_and_not_a_support_column() {
        let headers = ["id", "Method", "Name_of_the_Feature", "Availability", "Custom"]
            .map(String::from)
            .to_vec();
        let table = FeatureTable::from_records(
            headers,
            vec![cells(&["7", "Cards", "Saved cards", "Feature Request", "Yes"]), cells(&["8.0", "", "EMI", "Live", "No"])],
        )
        .unwrap();
        assert_eq!(table.support_columns(), ["Custom"]);
        assert_eq!(table.rows()[0].id(), Some(7));
        assert_eq!(table.rows()[1].id(), Some(8));
        assert_eq!(table.rows()[1].method(), "Cards");
    }

    #[test]
    fn non_integer_id_rejected() {
        let headers = ["id", "Method", "Name of the Feature", "Availability"].map(String::from).to_vec();
        let err = FeatureTable::from_records(headers, vec![cells(&["x", "UPI", "Intent", "Live"])])
            .unwrap_err();
        assert_matches!(err, CoreError::MalformedData(_));
    }

    #[test]
    fn resolve_support_column_is_normalized() {
        let table = sample_table();
        assert_eq!(table.resolve_support_column(" ecommerce"), Some("Ecommerce"));
        assert_eq!(table.resolve_support_column("Lending"), None);
    }
}
