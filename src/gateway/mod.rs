//! Gateway module - Route table, forwarding and liveness

pub mod health_check;
pub mod proxy;
pub mod router;

pub use proxy::Forwarder;
pub use router::{Route, RouteMatch, RouteTable};
