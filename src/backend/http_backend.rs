//! reqwest-backed upstream client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::backend::traits::UpstreamClient;
use crate::error::{AppError, Result};

/// Pooled HTTP client shared by every forwarding call
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Create a client whose requests are bounded by `timeout` end to end
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::RequestBuild(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let url = request.url().clone();

        self.client.execute(request).await.map_err(|e| {
            debug!(url = %url, error = %e, timeout = e.is_timeout(), "Upstream call failed");
            if e.is_builder() {
                AppError::RequestBuild(e.to_string())
            } else {
                AppError::BackendUnreachable(e.to_string())
            }
        })
    }
}
