//! Outbound transport seam used by the forwarder

use async_trait::async_trait;

use crate::error::Result;

/// Sends a fully built outbound request to a backend.
///
/// The gateway shares one implementation across all concurrent requests;
/// implementations must not hold per-request state.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Dispatch the request and return once the backend's response head
    /// has arrived. The body is left unread for the caller to stream.
    ///
    /// Failures to connect or to finish within the request's timeout are
    /// reported as [`AppError::BackendUnreachable`](crate::AppError::BackendUnreachable).
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}
