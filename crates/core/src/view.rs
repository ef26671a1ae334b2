//! The editable projection shown to the user after filtering.
//!
//! Only `status` and `comments` can change once a view exists. The projected
//! reckoner fields sit behind a shared reference, so nothing outside this
//! module can rewrite them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::ImplementationStatus;
use crate::table::{AVAILABILITY_COLUMN, FEATURE_NAME_COLUMN, FEATURE_REQUEST, METHOD_COLUMN};
use crate::types::DbId;

/// Header of the status column.
pub const STATUS_COLUMN: &str = "Implementation Status";
/// Header of the optional comments column.
pub const COMMENTS_COLUMN: &str = "Comments";

/// Read-only fields copied from a [`FeatureRow`](crate::table::FeatureRow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedFields {
    pub reckoner_id: Option<DbId>,
    pub method: String,
    pub feature_name: String,
    pub availability: String,
    pub checkout_support: String,
    pub vertical_support: String,
}

/// One row of a [`FilteredView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    #[serde(flatten)]
    fields: ProjectedFields,
    status: ImplementationStatus,
    comments: Option<String>,
}

impl ViewRow {
    /// Rebuild a row from stored parts.
    pub fn new(
        fields: ProjectedFields,
        status: ImplementationStatus,
        comments: Option<String>,
    ) -> Self {
        Self {
            fields,
            status,
            comments,
        }
    }

    pub fn fields(&self) -> &ProjectedFields {
        &self.fields
    }

    pub fn status(&self) -> ImplementationStatus {
        self.status
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn set_status(&mut self, status: ImplementationStatus) {
        self.status = status;
    }

    /// Whether the row's availability marks it as a pending feature request.
    pub fn is_feature_request(&self) -> bool {
        self.fields
            .availability
            .trim()
            .eq_ignore_ascii_case(FEATURE_REQUEST)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredView {
    checkout_column: String,
    vertical_column: String,
    comments_enabled: bool,
    rows: Vec<ViewRow>,
}

impl FilteredView {
    /// Assemble a view. When `comments_enabled` is set every row must carry
    /// a comment (possibly empty); otherwise none may.
    pub fn new(
        checkout_column: impl Into<String>,
        vertical_column: impl Into<String>,
        comments_enabled: bool,
        rows: Vec<ViewRow>,
    ) -> Result<Self, CoreError> {
        let view = Self {
            checkout_column: checkout_column.into(),
            vertical_column: vertical_column.into(),
            comments_enabled,
            rows,
        };
        view.validate()?;
        Ok(view)
    }

    /// Check the comments invariant. Needed after deserializing a view.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self
            .rows
            .iter()
            .position(|r| r.comments.is_some() != self.comments_enabled)
        {
            Some(pos) => Err(CoreError::MalformedData(format!(
                "Row {pos} comments do not match the view's comments setting"
            ))),
            None => Ok(()),
        }
    }

    pub fn checkout_column(&self) -> &str {
        &self.checkout_column
    }

    pub fn vertical_column(&self) -> &str {
        &self.vertical_column
    }

    pub fn comments_enabled(&self) -> bool {
        self.comments_enabled
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display headers in grid order.
    pub fn column_headers(&self) -> Vec<String> {
        let mut headers = vec![
            METHOD_COLUMN.to_string(),
            FEATURE_NAME_COLUMN.to_string(),
            AVAILABILITY_COLUMN.to_string(),
            self.checkout_column.clone(),
            self.vertical_column.clone(),
            STATUS_COLUMN.to_string(),
        ];
        if self.comments_enabled {
            headers.push(COMMENTS_COLUMN.to_string());
        }
        headers
    }

    pub fn set_status(&mut self, index: usize, status: ImplementationStatus) -> Result<(), CoreError> {
        self.row_mut(index)?.status = status;
        Ok(())
    }

    pub fn set_comments(&mut self, index: usize, comments: impl Into<String>) -> Result<(), CoreError> {
        if !self.comments_enabled {
            return Err(CoreError::Validation(
                "This view has no comments column".to_string(),
            ));
        }
        self.row_mut(index)?.comments = Some(comments.into());
        Ok(())
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut ViewRow, CoreError> {
        let len = self.rows.len();
        self.rows.get_mut(index).ok_or_else(|| {
            CoreError::Validation(format!("Row {index} is out of range (view has {len} rows)"))
        })
    }
}
