//! Error types for outbound API calls.
//!
//! There are only two real failure modes in this layer: the request didn't
//! make it (transport), or the body didn't match the declared shape (decode).
//! Rate-limit waits are delays, never errors. Clients collapse all of these
//! into an absent result at the public boundary; `FetchError` exists so the
//! internals can use `?` and log something useful before the collapse.

use thiserror::Error;

/// Errors that can occur while fetching from an external API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure: DNS, connection refused, timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was malformed or missing required fields.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The URL that was requested.
        url: String,
    },
}
