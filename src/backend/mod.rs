//! Backend module - outbound transport trait and HTTP client

pub mod http_backend;
pub mod traits;

pub use http_backend::HttpUpstream;
pub use traits::UpstreamClient;
