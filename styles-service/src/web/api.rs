//! REST API handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::state::AppState;
use crate::store::BoxStyles;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Element styles not found")),
    )
}

/// The cause is logged but never sent to the caller
fn internal_error(what: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("Failed to {}: {}", what, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}

/// Parse a style update body whatever its content type.
///
/// An empty body counts as `{}`, which overwrites every field with null.
fn parse_styles(body: &[u8]) -> Result<BoxStyles, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BoxStyles::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected style update body: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid JSON body: {}", e))),
        )
    })
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: true,
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    database: false,
                }),
            )
        }
    }
}

/// List every row of the example table
pub async fn list_examples(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    state
        .store
        .list_examples()
        .await
        .map(Json)
        .map_err(|e| internal_error("list examples", e))
}

/// Get element styles
pub async fn get_element_styles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.store.get_element_styles(&id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(internal_error("get element styles", e)),
    }
}

/// Update element styles
///
/// All eight fields are overwritten; fields missing from the body are stored as null.
pub async fn update_element_styles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let styles = parse_styles(&body)?;

    match state.store.update_element_styles(&id, &styles).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(internal_error("update element styles", e)),
    }
}
