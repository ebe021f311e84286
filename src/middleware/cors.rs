//! Cross-origin policy applied to responses for allowed origins

use axum::http::{header::ORIGIN, HeaderName, HeaderValue, Method, Request, Response};
use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tower_http::cors::{AllowOrigin, Cors, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Parsed allow-lists for cross-origin requests
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub origins: Vec<HeaderValue>,
    pub methods: Vec<Method>,
    pub headers: Vec<HeaderName>,
    pub allow_credentials: bool,
}

impl CorsPolicy {
    /// Build from configuration, skipping entries that fail to parse
    pub fn from_config(config: &CorsConfig) -> Self {
        let origins = config
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let methods = config
            .allowed_methods
            .iter()
            .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
            .collect();

        let headers = config
            .allowed_headers
            .iter()
            .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
            .collect();

        Self {
            origins,
            methods,
            headers,
            allow_credentials: config.allow_credentials,
        }
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.origins.contains(origin)
    }

    /// Only requests from an allowed origin see the CORS layer, including
    /// preflights. Everything else, plain `OPTIONS` included, goes straight
    /// to the router and gets no `Access-Control-Allow-*` headers.
    pub fn layer(&self) -> CorsGateLayer {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods(self.methods.clone())
            .allow_headers(self.headers.clone())
            .allow_credentials(self.allow_credentials);

        CorsGateLayer {
            policy: Arc::new(self.clone()),
            cors,
        }
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::from_config(&CorsConfig::default())
    }
}

/// Layer dispatching allowed-origin requests through [`CorsLayer`]
#[derive(Clone)]
pub struct CorsGateLayer {
    policy: Arc<CorsPolicy>,
    cors: CorsLayer,
}

impl<S: Clone> Layer<S> for CorsGateLayer {
    type Service = CorsGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsGate {
            cors: self.cors.layer(inner.clone()),
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Cross-origin gate service
#[derive(Clone)]
pub struct CorsGate<S> {
    inner: S,
    cors: Cors<S>,
    policy: Arc<CorsPolicy>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CorsGate<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.inner.poll_ready(cx) {
            Poll::Ready(Ok(())) => self.cors.poll_ready(cx),
            other => other,
        }
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let allowed = request
            .headers()
            .get(ORIGIN)
            .map_or(false, |origin| self.policy.allows(origin));

        if allowed {
            Box::pin(self.cors.call(request))
        } else {
            Box::pin(self.inner.call(request))
        }
    }
}
