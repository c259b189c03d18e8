//! HTTP transport for the token service.
//!
//! Exposes `GET /api/hash`, which answers with the two most recent tokens
//! wrapped in a JSON envelope.

mod http;
mod ip_filter;

pub use http::{router, TransportConfig};
pub use ip_filter::{IpFilterLayer, IpFilterService};
