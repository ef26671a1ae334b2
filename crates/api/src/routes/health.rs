use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the feature table has been loaded into the cache.
    pub reckoner_loaded: bool,
}

/// GET /health -- service, database and cache health.
///
/// Never loads anything itself; `reckoner_loaded` stays false until the
/// first request that needs the table.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = reckoner_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        reckoner_loaded: state.table_cache.is_loaded().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
