//! Gateway settings and configuration management

use crate::error::{AppError, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Path served by the gateway itself; never usable as a route prefix.
pub const HEALTH_PATH: &str = "/health";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_request_body_bytes")]
    pub max_request_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_request_body_bytes() -> usize {
    100 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_body_bytes: default_max_request_body_bytes(),
        }
    }
}

/// Outbound forwarding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Full round-trip budget for one backend call, body included
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    30_000
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout(),
        }
    }
}

/// Cross-origin policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    ["Origin", "Content-Type", "Accept", "Authorization"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            allow_credentials: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// A path prefix forwarded to one backend base URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub prefix: String,
    pub backend: String,
}

impl RouteConfig {
    pub fn new(prefix: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            backend: backend.into(),
        }
    }
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/auth", "http://auth-server:5050"),
        RouteConfig::new("/crud", "http://crud-server:6000"),
        RouteConfig::new("/event", "http://event-server:6050"),
        RouteConfig::new("/search", "http://search-server:7000"),
    ]
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path.to_str().unwrap_or("config/default.toml");

        let config = Config::builder()
            // Missing file falls back to the built-in defaults
            .add_source(File::with_name(name).required(false))
            // Override with environment variables (prefixed with GATEWAY__)
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("cors.allowed_methods")
                    .with_list_parse_key("cors.allowed_headers")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.proxy.timeout_ms == 0 {
            return Err(invalid("Proxy timeout cannot be 0"));
        }

        if self.routes.is_empty() {
            return Err(invalid("At least one route must be configured"));
        }

        let mut seen = HashSet::new();
        for route in &self.routes {
            let prefix = route.prefix.as_str();
            if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
                return Err(invalid(format!(
                    "Route prefix '{}' must start with '/', be non-empty and have no trailing '/'",
                    prefix
                )));
            }
            if prefix == HEALTH_PATH {
                return Err(invalid(format!("Route prefix '{}' is reserved", prefix)));
            }
            if !seen.insert(prefix) {
                return Err(invalid(format!("Duplicate route prefix '{}'", prefix)));
            }

            let url = reqwest::Url::parse(&route.backend).map_err(|e| {
                invalid(format!(
                    "Route '{}' has invalid backend '{}': {}",
                    prefix, route.backend, e
                ))
            })?;
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(invalid(format!(
                    "Route '{}' backend '{}' must be an absolute http(s) URL",
                    prefix, route.backend
                )));
            }
            // The remaining request path is appended verbatim
            if route.backend.ends_with('/')
                || url.path() != "/"
                || url.query().is_some()
                || url.fragment().is_some()
            {
                return Err(invalid(format!(
                    "Route '{}' backend '{}' must not carry a path, query or trailing '/'",
                    prefix, route.backend
                )));
            }
        }

        for origin in &self.cors.allowed_origins {
            HeaderValue::from_str(origin)
                .map_err(|_| invalid(format!("Invalid CORS origin '{}'", origin)))?;
        }
        for method in &self.cors.allowed_methods {
            Method::from_bytes(method.as_bytes())
                .map_err(|_| invalid(format!("Invalid CORS method '{}'", method)))?;
        }
        for header in &self.cors.allowed_headers {
            HeaderName::from_bytes(header.as_bytes())
                .map_err(|_| invalid(format!("Invalid CORS header '{}'", header)))?;
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            proxy: ProxyConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
            routes: default_routes(),
        }
    }
}
