//! Fixed-window rate limiter for outbound API calls.
//!
//! Each gateway owns one limiter configured with that API's published
//! ceiling. The limiter counts requests issued in the current one-second
//! window; when the ceiling is reached, `acquire` sleeps out the remainder
//! of the window plus a small safety buffer, then starts a fresh window.
//! Bursts up to the ceiling are allowed, and the window resets in full --
//! this is not a token bucket.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Length of one rate-limit window.
const WINDOW: Duration = Duration::from_secs(1);

/// Extra wait past the window boundary, so a reset on our side never races
/// the server's own window bookkeeping.
const RESET_BUFFER: Duration = Duration::from_millis(100);

/// State of the current window.
#[derive(Debug)]
struct Window {
    /// Requests issued since the window started.
    issued: u32,
    /// When the window started.
    started: Instant,
}

/// Serializes and paces callers against a requests-per-second ceiling.
///
/// The window state sits behind an async mutex that is held across the
/// wait, so concurrent callers line up on the shared counter rather than
/// all sleeping and then bursting together.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Mutex<Window>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_second` calls per window.
    /// A limit of zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            limit: requests_per_second.max(1),
            window: Mutex::new(Window {
                issued: 0,
                started: Instant::now(),
            }),
        }
    }

    /// The configured ceiling.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Wait until the protected resource may be called again.
    ///
    /// Never fails; at worst it delays. The sleep is a cancellable timed
    /// wait: dropping the future releases the window untouched.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;
        let elapsed = window.started.elapsed();

        if window.issued >= self.limit && elapsed < WINDOW {
            let wait = WINDOW - elapsed + RESET_BUFFER;
            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting for window reset");
            tokio::time::sleep(wait).await;
            window.issued = 0;
            window.started = Instant::now();
        } else if elapsed >= WINDOW {
            window.issued = 0;
            window.started = Instant::now();
        }

        window.issued += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_acquires_up_to_limit_without_delay() {
        let limiter = RateLimiter::new(5);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_over_limit_call_waits_past_window_boundary() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        // Remaining window (a full second, nothing has elapsed under the
        // paused clock) plus the 100 ms reset buffer.
        assert_eq!(start.elapsed(), Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_elapsing() {
        let limiter = RateLimiter::new(1);
        limiter.acquire().await;

        tokio::time::advance(Duration::from_millis(1500)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_window_available_after_reset() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            limiter.acquire().await;
        }

        // Fourth call waits out the window, then counts as the first of
        // the fresh one; two more fit without waiting.
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_the_counter() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(2));
        let start = Instant::now();

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // Three callers against a limit of two: exactly one window wait.
        assert_eq!(start.elapsed(), Duration::from_millis(1100));
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        assert_eq!(RateLimiter::new(0).limit(), 1);
        assert_eq!(RateLimiter::new(25).limit(), 25);
    }
}
