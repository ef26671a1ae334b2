#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reckoner_api::config::{
    AnnotationBackendConfig, FeatureSourceConfig, ReckonerConfig, ReferenceSourceConfig,
    ServerConfig,
};
use reckoner_api::router::build_app_router;
use reckoner_api::state::{AppState, Backends};
use reckoner_db::DbPool;

pub const SAMPLE_CSV: &str = "\
id,Method,Name_of_the_Feature,Availability,Standard,Custom,Ecommerce,Lending
1,PayNow,Retry,Live,Yes,No,Yes,No
2,,Timeout,Live,Yes,Yes,No,No
3,Wallet,Refunds,Feature Request,No,No,Yes,Yes
4,UPI,Collect,Live,Yes,Yes,Yes,Yes
";

/// Build a test `ServerConfig` with safe defaults.
///
/// The feature table comes from `csv_path`, reference sets from JSON files
/// under `reference_dir`, and annotations go to the SQLite pool.
pub fn test_config(csv_path: &Path, reference_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_json: false,
        reckoner: ReckonerConfig {
            database_url: "sqlite::memory:".to_string(),
            feature_source: FeatureSourceConfig::Csv {
                path: csv_path.to_path_buf(),
            },
            reference_source: ReferenceSourceConfig::Json {
                dir: reference_dir.to_path_buf(),
            },
            annotations: AnnotationBackendConfig::Sqlite {
                name: "filtered_data".to_string(),
            },
            comments_enabled: true,
            feature_flags_enabled: false,
        },
    }
}

/// An in-memory database with migrations applied.
pub async fn memory_pool() -> DbPool {
    let pool = reckoner_db::create_pool("sqlite::memory:").await.unwrap();
    reckoner_db::run_migrations(&pool).await.unwrap();
    pool
}

/// A scratch directory holding the sample CSV and reference JSON files.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("reckoner.csv"), SAMPLE_CSV).unwrap();
        let reference = dir.path().join("static_data");
        std::fs::create_dir_all(&reference).unwrap();
        std::fs::write(
            reference.join("checkout_types.json"),
            r#"{"checkout_types": ["Standard", "Custom"]}"#,
        )
        .unwrap();
        std::fs::write(
            reference.join("vertical_names.json"),
            r#"{"vertical_names": ["Ecommerce", "Lending"]}"#,
        )
        .unwrap();
        std::fs::write(
            reference.join("methods.json"),
            r#"{"methods": ["PayNow", "Wallet", "UPI"]}"#,
        )
        .unwrap();
        Self { dir }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.path().join("reckoner.csv")
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.dir.path().join("static_data")
    }

    pub fn config(&self) -> ServerConfig {
        test_config(&self.csv_path(), &self.reference_dir())
    }
}

/// Build the full application router plus its state from `config`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(config: ServerConfig, pool: DbPool) -> (Router, AppState) {
    let backends = Backends::from_config(&config.reckoner, &pool);
    build_test_app_with(config, pool, backends)
}

/// Like [`build_test_app`] but with explicitly chosen backends.
pub fn build_test_app_with(
    config: ServerConfig,
    pool: DbPool,
    backends: Backends,
) -> (Router, AppState) {
    let state = AppState::new(pool, config.clone(), backends);
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

pub fn with_annotation_store(
    backends: Backends,
    store: Arc<dyn reckoner_core::store::AnnotationStore>,
) -> Backends {
    Backends {
        annotations: store,
        ..backends
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the decoded body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
