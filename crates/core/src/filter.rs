//! Filter engine: project the reckoner down to the rows and columns relevant
//! to one checkout type, one vertical and a set of payment methods.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::status::ImplementationStatus;
use crate::table::FeatureTable;
use crate::view::{FilteredView, ProjectedFields, ViewRow};

/// Message returned when no usable method was selected.
pub const NO_METHOD_MESSAGE: &str = "Please select at least one method";

/// The user's selector choices.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FilterCriteria {
    pub checkout_type: String,
    pub vertical_name: String,
    #[validate(
        length(min = 1, message = "Please select at least one method"),
        custom(function = "has_named_method")
    )]
    pub methods: Vec<String>,
}

/// Optional capabilities of the produced view.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Add an empty comments cell to every row.
    pub comments: bool,
}

fn has_named_method(methods: &[String]) -> Result<(), ValidationError> {
    if methods.iter().all(|m| m.trim().is_empty()) {
        return Err(ValidationError::new("blank_methods").with_message(NO_METHOD_MESSAGE.into()));
    }
    Ok(())
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect();
    messages.dedup();
    messages.join("; ")
}

/// Run the filter over `table`, producing a new independent view.
///
/// Rows keep their source order. Requested methods are trimmed before
/// matching; the table's own method cells are compared as stored.
pub fn filter(
    criteria: &FilterCriteria,
    table: &FeatureTable,
    options: FilterOptions,
) -> Result<FilteredView, CoreError> {
    criteria
        .validate()
        .map_err(|e| CoreError::Validation(validation_message(&e)))?;

    let checkout = table.resolve_support_column(&criteria.checkout_type);
    let vertical = table.resolve_support_column(&criteria.vertical_name);
    let (Some(checkout), Some(vertical)) = (checkout, vertical) else {
        let mut missing = Vec::new();
        if checkout.is_none() {
            missing.push(criteria.checkout_type.clone());
        }
        if vertical.is_none() {
            missing.push(criteria.vertical_name.clone());
        }
        return Err(CoreError::Schema { missing });
    };

    let wanted: Vec<&str> = criteria
        .methods
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();

    let rows = table
        .rows()
        .iter()
        .filter(|row| wanted.contains(&row.method()))
        .map(|row| {
            ViewRow::new(
                ProjectedFields {
                    reckoner_id: row.id(),
                    method: row.method().to_string(),
                    feature_name: row.feature_name().to_string(),
                    availability: row.availability().to_string(),
                    checkout_support: row.support(checkout).unwrap_or_default().to_string(),
                    vertical_support: row.support(vertical).unwrap_or_default().to_string(),
                },
                ImplementationStatus::Unset,
                options.comments.then(String::new),
            )
        })
        .collect();

    FilteredView::new(checkout, vertical, options.comments, rows)
}
