#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a [`CoreError::Schema`] from any list of column names.
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Schema {
            missing: columns.into_iter().map(Into::into).collect(),
        }
    }
}
