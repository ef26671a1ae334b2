//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod annotation_repo;
pub mod feature_flag_repo;
pub mod reckoner_repo;
pub mod reference_repo;

pub use annotation_repo::AnnotationRepo;
pub use feature_flag_repo::FeatureFlagRepo;
pub use reckoner_repo::ReckonerRepo;
pub use reference_repo::ReferenceRepo;

/// Quote an SQLite identifier, doubling any embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Whether `err` is SQLite reporting an absent table.
pub fn is_missing_table(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.message().contains("no such table"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("Cross Borders - Export Flow"), "\"Cross Borders - Export Flow\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }
}
