/// Row identifier used by the SQLite tables (`INTEGER PRIMARY KEY`).
pub type DbId = i64;

/// Timestamp type used for save bookkeeping.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
