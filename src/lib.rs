//! Service Gateway
//!
//! A reverse-proxy gateway that dispatches inbound requests by path prefix
//! to fixed microservice backends and relays their responses.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::{HttpUpstream, UpstreamClient};
use gateway::{Forwarder, RouteTable};
use middleware::CorsPolicy;

/// Application state shared across all handlers; read-only after startup
pub struct AppState {
    pub routes: RouteTable,
    pub forwarder: Forwarder,
    pub cors: CorsPolicy,
    pub max_request_body_bytes: usize,
}

impl AppState {
    /// Build state around the given upstream client
    pub fn new(settings: &config::Settings, upstream: Arc<dyn UpstreamClient>) -> Self {
        let routes = RouteTable::from_config(&settings.routes);
        let forwarder = Forwarder::new(upstream, settings.proxy.timeout());
        let cors = CorsPolicy::from_config(&settings.cors);
        let max_request_body_bytes = settings.server.max_request_body_bytes;

        Self {
            routes,
            forwarder,
            cors,
            max_request_body_bytes,
        }
    }

    /// Build state with the pooled reqwest client
    pub fn from_settings(settings: &config::Settings) -> Result<Self> {
        let upstream = HttpUpstream::new(settings.proxy.timeout())?;
        Ok(Self::new(settings, Arc::new(upstream)))
    }
}
