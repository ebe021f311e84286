//! Request forwarding: builds the outbound call and relays the backend response

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName},
    response::Response,
};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::backend::UpstreamClient;
use crate::error::{AppError, Result};
use crate::gateway::router::Route;
use crate::AppState;

/// Per-hop headers never copied onto the outbound request
pub const HOP_BY_HOP_HEADERS: [HeaderName; 2] = [header::CONNECTION, header::TRANSFER_ENCODING];

/// The only backend response headers copied back to the caller
pub const RELAYED_RESPONSE_HEADERS: [HeaderName; 2] =
    [header::ACCESS_CONTROL_ALLOW_ORIGIN, header::AUTHORIZATION];

/// Build `backend + path`, appending the raw query string when present
pub fn target_url(backend: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!("{}{}", backend, path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Copy inbound headers minus hop-by-hop ones.
///
/// `Host` is left for the client to derive from the target URL.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.keys_len());
    for (name, value) in inbound {
        if HOP_BY_HOP_HEADERS.contains(name) || *name == header::HOST {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Pick the allow-listed headers out of a backend response (first value only)
pub fn relayed_headers(backend: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in &RELAYED_RESPONSE_HEADERS {
        if let Some(value) = backend.get(name) {
            headers.insert(name.clone(), value.clone());
        }
    }
    headers
}

/// Forwards matched requests through a shared upstream client
#[derive(Clone)]
pub struct Forwarder {
    upstream: Arc<dyn UpstreamClient>,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(upstream: Arc<dyn UpstreamClient>, timeout: Duration) -> Self {
        Self { upstream, timeout }
    }

    /// Forward `request` to `route`, with `path` being the part left after
    /// the route prefix.
    pub async fn forward(&self, route: &Route, path: &str, request: Request) -> Result<Response> {
        let (parts, body) = request.into_parts();
        let target = target_url(&route.backend, path, parts.uri.query());

        let url = reqwest::Url::parse(&target).map_err(|e| {
            warn!(prefix = %route.prefix, target = %target, error = %e, "Failed to create request");
            AppError::RequestBuild(format!("{}: {}", target, e))
        })?;

        let mut outbound = reqwest::Request::new(parts.method.clone(), url);
        *outbound.headers_mut() = outbound_headers(&parts.headers);
        *outbound.timeout_mut() = Some(self.timeout);
        if !body.is_end_stream() {
            *outbound.body_mut() = Some(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        debug!(method = %parts.method, prefix = %route.prefix, target = %target, "Forwarding request");

        let response = self.upstream.send(outbound).await.map_err(|e| {
            warn!(prefix = %route.prefix, target = %target, error = %e, "Backend call failed");
            e
        })?;

        self.relay(response, target).await
    }

    /// Stream the backend response back. The first chunk is read before the
    /// head is committed so an early body failure can still become a 500.
    async fn relay(&self, response: reqwest::Response, target: String) -> Result<Response> {
        let status = response.status();
        let headers = relayed_headers(response.headers());

        let mut chunks = response.bytes_stream();
        let first = match chunks.next().await {
            Some(Ok(bytes)) => Some(bytes),
            Some(Err(e)) => {
                error!(target = %target, error = %e, "Failed to forward response");
                return Err(AppError::RelayFailed(e.to_string()));
            }
            None => None,
        };

        let body = stream::iter(first.map(Ok))
            .chain(chunks)
            .inspect_err(move |e| {
                // Status already sent; the connection is aborted instead
                error!(target = %target, error = %e, "Failed to forward response");
            });

        let mut relayed = Response::new(Body::from_stream(body));
        *relayed.status_mut() = status;
        relayed.headers_mut().extend(headers);
        Ok(relayed)
    }
}

/// Fallback handler: resolve the route and forward, or 404
pub async fn proxy_request(State(state): State<Arc<AppState>>, request: Request) -> Result<Response> {
    let path = request.uri().path().to_owned();
    let matched = state
        .routes
        .resolve(&path)
        .ok_or_else(|| AppError::RouteNotFound(path.clone()))?;

    state.forwarder.forward(matched.route, matched.path, request).await
}
