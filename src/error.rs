//! Common error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound request could not be assembled (bad method, URL or header)
    #[error("Failed to create request: {0}")]
    RequestBuild(String),

    /// Connection refused, DNS failure or round-trip timeout
    #[error("Failed to reach microservice: {0}")]
    BackendUnreachable(String),

    /// Backend body failed while being streamed back to the caller
    #[error("Failed to forward response: {0}")]
    RelayFailed(String),

    #[error("No route for path: {0}")]
    RouteNotFound(String),
}

/// Error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    /// Fixed message exposed to callers; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Config(_) | AppError::Io(_) => "Internal server error",
            AppError::RequestBuild(_) => "Failed to create request",
            AppError::BackendUnreachable(_) => "Failed to reach microservice",
            AppError::RelayFailed(_) => "Failed to forward response",
            AppError::RouteNotFound(_) => "Not found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.public_message().to_string(),
        });

        (self.status_code(), body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
