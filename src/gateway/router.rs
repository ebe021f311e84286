//! Prefix router mapping inbound paths to backend base URLs

use tracing::debug;

use crate::config::RouteConfig;

/// A single path-prefix route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Leading-slash prefix without trailing slash, e.g. `/auth`
    pub prefix: String,
    /// Backend base URL, e.g. `http://auth-server:5050`
    pub backend: String,
}

impl Route {
    pub fn new(prefix: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            backend: backend.into(),
        }
    }

    /// Path left after stripping this route's prefix, if the prefix matches
    /// on a segment boundary. A bare prefix resolves to `/`.
    fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

impl From<&RouteConfig> for Route {
    fn from(config: &RouteConfig) -> Self {
        Route::new(config.prefix.clone(), config.backend.clone())
    }
}

/// Outcome of resolving a path against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Remaining path, always starting with `/`
    pub path: &'a str,
}

/// Ordered route table; the first matching prefix wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn from_config(routes: &[RouteConfig]) -> Self {
        Self::new(routes.iter().map(Route::from).collect())
    }

    /// Resolve an inbound path in registration order
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        let found = self.routes.iter().find_map(|route| {
            route
                .strip(path)
                .map(|rest| RouteMatch { route, path: rest })
        });

        match &found {
            Some(m) => debug!(prefix = %m.route.prefix, backend = %m.route.backend, "Route matched"),
            None => debug!(path = %path, "No route matched"),
        }

        found
    }
}
