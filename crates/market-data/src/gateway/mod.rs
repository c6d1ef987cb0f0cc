//! Outbound request plumbing: rate limiting, transport, and the
//! per-API gateway every call is routed through.

mod api_gateway;
mod rate_limiter;
pub(crate) mod transport;

pub use api_gateway::ApiGateway;
pub use rate_limiter::RateLimiter;
pub use transport::{HttpTransport, Transport};
