mod common;

use axum::http::StatusCode;
use serde_json::json;

use reckoner_api::config::{FeatureSourceConfig, ReferenceSourceConfig};

use common::{build_test_app, expect_json, get, memory_pool, post, post_json, Fixture};

async fn seed(pool: &reckoner_db::DbPool) {
    sqlx::query(
        "CREATE TABLE reckoner (
            id INTEGER PRIMARY KEY,
            Method TEXT,
            Name_of_the_Feature TEXT,
            Availability TEXT,
            Standard TEXT,
            Lending TEXT
        )",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO reckoner VALUES
            (1, 'UPI', 'Collect', 'Live', 'Yes', 'No'),
            (2, NULL, 'Intent', 'Live', 'No', 'Yes')",
    )
    .execute(pool)
    .await
    .unwrap();
    for (table, column, value) in [
        ("checkout_types", "checkout", "Standard"),
        ("vertical_names", "vertical", "Lending"),
        ("methods", "method", "UPI"),
    ] {
        sqlx::query(&format!("INSERT INTO {table} ({column}) VALUES (?1)"))
            .bind(value)
            .execute(pool)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn sqlite_sources_drive_the_session() {
    let fixture = Fixture::new();
    let mut config = fixture.config();
    config.reckoner.feature_source = FeatureSourceConfig::Sqlite {
        table: "reckoner".to_string(),
    };
    config.reckoner.reference_source = ReferenceSourceConfig::Sqlite;
    let pool = memory_pool().await;
    seed(&pool).await;
    let (app, _) = build_test_app(config, pool);

    let body = expect_json(get(&app, "/api/v1/reference").await, StatusCode::OK).await;
    assert_eq!(body["data"]["methods"], json!(["UPI"]));

    let body = expect_json(
        post_json(
            &app,
            "/api/v1/session/filter",
            json!({
                "checkout_type": "standard",
                "vertical_name": "Lending",
                "methods": [" UPI "],
            }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let rows = body["data"]["view"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["method"], "UPI");
    assert_eq!(rows[1]["reckoner_id"], 2);

    expect_json(post(&app, "/api/v1/session/save").await, StatusCode::OK).await;
    let saved = expect_json(get(&app, "/api/v1/annotations").await, StatusCode::OK).await;
    assert_eq!(saved["data"]["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn absent_reckoner_table_is_404() {
    let fixture = Fixture::new();
    let mut config = fixture.config();
    config.reckoner.feature_source = FeatureSourceConfig::Sqlite {
        table: "reckoner".to_string(),
    };
    let (app, _) = build_test_app(config, memory_pool().await);

    let body = expect_json(get(&app, "/api/v1/reckoner").await, StatusCode::NOT_FOUND).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
