//! API module - Router assembly

pub mod routes;

pub use routes::create_router;
