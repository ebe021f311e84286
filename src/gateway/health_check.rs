//! Liveness endpoint for the gateway process itself

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Body returned by `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Always healthy while the process is serving; backends are never consulted.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" }))
}
