//! Repository for the `checkout_types`, `vertical_names` and `methods` tables.

use sqlx::SqlitePool;

pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Checkout type names in id order.
    pub async fn list_checkout_types(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT checkout FROM checkout_types WHERE checkout IS NOT NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Vertical names in id order.
    pub async fn list_vertical_names(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT vertical FROM vertical_names WHERE vertical IS NOT NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Payment method names in id order.
    pub async fn list_methods(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT method FROM methods WHERE method IS NOT NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
