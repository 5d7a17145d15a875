//! Integration tests against a live Postgres
//!
//! These tests require a reachable database configured through the usual
//! libpq variables (PGHOST, PGPORT, PGUSER, PGPASSWORD, PGDATABASE).
//! They create `example_table` and `element_styles` if missing.
//!
//! Run with: cargo test -p styles-service --test postgres -- --include-ignored

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use styles_service::config::DatabaseConfig;
use styles_service::db::{Database, ReadinessPolicy};
use styles_service::store::{BoxStyles, StyleStore};
use styles_service::web::{create_router, state::AppState};

async fn connect() -> Database {
    let defaults = DatabaseConfig::default();
    let config = DatabaseConfig {
        host: std::env::var("PGHOST").unwrap_or(defaults.host.clone()),
        port: std::env::var("PGPORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        ..defaults
    };
    let policy = ReadinessPolicy {
        max_elapsed: Duration::from_secs(5),
        ..Default::default()
    };

    let db = Database::connect(&config, &policy)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS example_table (
            id SERIAL PRIMARY KEY,
            name TEXT
        )
        "#,
    )
    .execute(db.pool())
    .await
    .expect("Failed to create example_table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS element_styles (
            element_id INTEGER PRIMARY KEY,
            margin_top INTEGER,
            margin_right INTEGER,
            margin_bottom INTEGER,
            margin_left INTEGER,
            padding_top INTEGER,
            padding_right INTEGER,
            padding_bottom INTEGER,
            padding_left INTEGER
        )
        "#,
    )
    .execute(db.pool())
    .await
    .expect("Failed to create element_styles");

    db
}

/// Reset one element to margins of 10 and paddings of 5
async fn seed_element(db: &Database, element_id: i32) {
    sqlx::query(
        r#"
        INSERT INTO element_styles VALUES ($1, 10, 10, 10, 10, 5, 5, 5, 5)
        ON CONFLICT (element_id) DO UPDATE SET
            margin_top = 10, margin_right = 10, margin_bottom = 10, margin_left = 10,
            padding_top = 5, padding_right = 5, padding_bottom = 5, padding_left = 5
        "#,
    )
    .bind(element_id)
    .execute(db.pool())
    .await
    .expect("Failed to seed element");
}

async fn remove_element(db: &Database, element_id: i32) {
    sqlx::query("DELETE FROM element_styles WHERE element_id = $1")
        .bind(element_id)
        .execute(db.pool())
        .await
        .expect("Failed to remove element");
}

fn update_body(margin_top: i64) -> Value {
    json!({
        "margin_top": margin_top, "margin_right": 10, "margin_bottom": 10, "margin_left": 10,
        "padding_top": 5, "padding_right": 5, "padding_bottom": 5, "padding_left": 5
    })
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_get_styles_matches_stored_row() {
    let db = connect().await;
    seed_element(&db, 91_001).await;

    let row = db.get_element_styles("91001").await.unwrap().unwrap();
    let object = row.as_object().unwrap();
    assert_eq!(object.len(), 9);
    assert_eq!(row["element_id"], 91_001);
    assert_eq!(row["margin_top"], 10);
    assert_eq!(row["padding_left"], 5);

    db.close().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_put_then_get_over_http() {
    let db = connect().await;
    seed_element(&db, 91_002).await;
    let app = create_router(AppState::new(Arc::new(db.clone())));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/element/91002/styles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(update_body(20).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let updated: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated["margin_top"], 20);
    assert_eq!(updated["margin_right"], 10);

    let request = Request::builder()
        .uri("/element/91002/styles")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let fetched: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fetched, updated);

    db.close().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_update_is_idempotent_and_full_overwrite() {
    let db = connect().await;
    seed_element(&db, 91_003).await;

    let styles: BoxStyles = serde_json::from_value(update_body(30)).unwrap();
    let first = db.update_element_styles("91003", &styles).await.unwrap();
    let second = db.update_element_styles("91003", &styles).await.unwrap();
    assert_eq!(first, second);

    let partial = BoxStyles {
        margin_top: Some(json!(1)),
        ..Default::default()
    };
    let row = db
        .update_element_styles("91003", &partial)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["margin_top"], 1);
    assert_eq!(row["margin_right"], Value::Null);

    db.close().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_absent_element() {
    let db = connect().await;
    remove_element(&db, 91_999).await;

    assert!(db.get_element_styles("91999").await.unwrap().is_none());
    let styles: BoxStyles = serde_json::from_value(update_body(1)).unwrap();
    assert!(db
        .update_element_styles("91999", &styles)
        .await
        .unwrap()
        .is_none());

    db.close().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_examples_match_row_count() {
    let db = connect().await;

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM example_table")
        .fetch_one(db.pool())
        .await
        .unwrap();
    let rows = db.list_examples().await.unwrap();
    assert_eq!(rows.len() as i64, count);

    db.ping().await.unwrap();
    db.close().await;
}

/// A schema whose `element_styles` is keyed by text, reached through search_path
async fn connect_text_keyed() -> Database {
    let setup = connect().await;
    sqlx::query("CREATE SCHEMA IF NOT EXISTS styles_text_key")
        .execute(setup.pool())
        .await
        .expect("Failed to create schema");
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS styles_text_key.element_styles (
            element_id TEXT PRIMARY KEY,
            margin_top TEXT,
            margin_right TEXT,
            margin_bottom TEXT,
            margin_left TEXT,
            padding_top TEXT,
            padding_right TEXT,
            padding_bottom TEXT,
            padding_left TEXT
        )
        "#,
    )
    .execute(setup.pool())
    .await
    .expect("Failed to create text-keyed element_styles");
    setup.close().await;

    let options = PgConnectOptions::new().options([("search_path", "styles_text_key")]);
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to connect with search_path");
    Database::from_pool(pool)
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_text_keyed_table() {
    let db = connect_text_keyed().await;
    sqlx::query(
        r#"
        INSERT INTO element_styles
        VALUES ('btn-save', '1px', '1px', '1px', '1px', '2px', '2px', '2px', '2px')
        ON CONFLICT (element_id) DO UPDATE SET margin_top = '1px'
        "#,
    )
    .execute(db.pool())
    .await
    .expect("Failed to seed text-keyed element");

    let row = db.get_element_styles("btn-save").await.unwrap().unwrap();
    assert_eq!(row["element_id"], "btn-save");
    assert_eq!(row["margin_top"], "1px");

    let app = create_router(AppState::new(Arc::new(db.clone())));
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/element/btn-save/styles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"margin_top": "8px", "padding_left": "3px"}).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let updated: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated["margin_top"], "8px");
    assert_eq!(updated["padding_left"], "3px");
    assert_eq!(updated["margin_right"], Value::Null);

    assert!(db.get_element_styles("btn-missing").await.unwrap().is_none());
    db.close().await;
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_non_integer_id_against_integer_key_is_a_query_error() {
    let db = connect().await;
    let app = create_router(AppState::new(Arc::new(db.clone())));

    let request = Request::builder()
        .uri("/element/abc/styles")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    db.close().await;
}
