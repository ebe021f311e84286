//! HTTP surface of the gateway

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::HEALTH_PATH;
use crate::gateway::{health_check, proxy};
use crate::AppState;

/// Build the router: liveness route, prefix-dispatch fallback and the
/// cross-origin, body-limit and access-log layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_check::health))
        .fallback(proxy::proxy_request)
        .layer(RequestBodyLimitLayer::new(state.max_request_body_bytes))
        .layer(state.cors.layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
