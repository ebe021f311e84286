//! Middleware module - Cross-origin policy

pub mod cors;

pub use cors::CorsPolicy;
