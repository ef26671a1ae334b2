//! HTTP adapter for the ready reckoner: configuration, shared state, and the
//! axum router over the `reckoner_core` operations.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
