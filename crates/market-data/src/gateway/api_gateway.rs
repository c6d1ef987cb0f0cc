//! The single chokepoint for one external API.

use std::future::Future;
use std::sync::Arc;

use crate::errors::FetchError;

use super::rate_limiter::RateLimiter;
use super::transport::{HttpTransport, Transport};

/// Binds a base URL, a rate limit, and an HTTP transport.
///
/// Every outbound call for one API goes through [`execute`](Self::execute),
/// which acquires the limiter before running the operation. No client holds
/// the transport directly, so nothing can bypass the pacing.
pub struct ApiGateway {
    base_url: String,
    limiter: RateLimiter,
    transport: Arc<dyn Transport>,
}

impl ApiGateway {
    /// Create a gateway over the production HTTP transport.
    pub fn new(base_url: impl Into<String>, requests_per_second: u32) -> Self {
        Self::with_transport(base_url, requests_per_second, Arc::new(HttpTransport::new()))
    }

    /// Create a gateway over a caller-supplied transport.
    ///
    /// This is the seam for wiring in a fake transport in tests, or a
    /// shared/instrumented one in an application.
    pub fn with_transport(
        base_url: impl Into<String>,
        requests_per_second: u32,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            limiter: RateLimiter::new(requests_per_second),
            transport,
        }
    }

    /// The API's base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured requests-per-second ceiling.
    pub fn rate_limit(&self) -> u32 {
        self.limiter.limit()
    }

    /// Run one throttled operation: acquire the rate limiter, then hand the
    /// transport to `operation` (an HTTP call plus response decoding).
    ///
    /// Faults from the operation propagate unchanged; there is no retry and
    /// no fault translation here.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, FetchError>
    where
        F: FnOnce(Arc<dyn Transport>) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.limiter.acquire().await;
        operation(Arc::clone(&self.transport)).await
    }
}
