//! SQLite persistence for the ready reckoner.
//!
//! Repositories are thin SQL wrappers returning `sqlx::Error`; the
//! [`sources`] module adapts them to the `reckoner_core` source and store
//! traits and translates failures into `CoreError`.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod sources;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL, creating the file if needed.
///
/// In-memory URLs get a single connection that never expires, since every
/// SQLite in-memory connection is its own database.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };
    pool_options.connect_with(options).await
}

/// Check that the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
