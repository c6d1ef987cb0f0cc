//! The HTTP seam behind the gateway.
//!
//! Clients never hold an HTTP client directly; they receive a `Transport`
//! from the gateway's `execute` and everything else (TLS, timeouts, status
//! handling) lives in the production implementation. Tests swap in a fake
//! to count and script requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::FetchError;

/// Request timeout for the production transport.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A GET-only HTTP transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and return the raw response body.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production transport backed by a shared reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default request timeout.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    enum Scripted {
        Body(Vec<u8>),
        Fail(u16),
    }

    /// Scriptable transport double: canned responses matched by URL
    /// substring, with a log of every request issued.
    pub(crate) struct FakeTransport {
        routes: Mutex<Vec<(String, Scripted)>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self {
                routes: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Serve `body` for any URL containing `url_part`.
        pub fn respond(&self, url_part: &str, body: impl Into<Vec<u8>>) {
            self.script(url_part, Scripted::Body(body.into()));
        }

        /// Answer any URL containing `url_part` with an HTTP error status.
        pub fn fail(&self, url_part: &str, status: u16) {
            self.script(url_part, Scripted::Fail(status));
        }

        // Rescripting the same part replaces the route, so a test can
        // flip an endpoint between failure and success mid-flight.
        fn script(&self, url_part: &str, scripted: Scripted) {
            let mut routes = self.routes.lock().unwrap();
            if let Some(route) = routes.iter_mut().find(|(part, _)| part == url_part) {
                route.1 = scripted;
            } else {
                routes.push((url_part.to_string(), scripted));
            }
        }

        /// Every URL requested so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            let routes = self.routes.lock().unwrap();
            for (part, scripted) in routes.iter() {
                if url.contains(part.as_str()) {
                    return match scripted {
                        Scripted::Body(body) => Ok(body.clone()),
                        Scripted::Fail(status) => Err(FetchError::Status {
                            status: *status,
                            url: url.to_string(),
                        }),
                    };
                }
            }
            Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }
}
