//! System endpoints: liveness and the startup readiness snapshot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::readiness::ReadinessReport;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /ready`: result of the startup database check.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "System",
    summary = "Startup readiness",
    description = "Returns the database readiness report recorded once at startup. \
                   The process only serves traffic after the check passed, so this \
                   is a snapshot and not a live probe.",
    responses(
        (status = 200, description = "Database was verified at startup", body = ReadinessReport),
    )
)]
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.readiness.as_ref().clone()))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}
