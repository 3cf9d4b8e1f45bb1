//! Retry policy, request budget and the sleep seam used for backoff.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Attempts made before a request is given up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Backoff after a 429, a 5xx or a transport failure. Matches the
/// Snipe-IT rate limit window.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Pause taken when the local per-minute budget is used up.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between retries.
    pub retry_delay: Duration,
    /// Pause when the local request budget is exhausted.
    pub rate_window: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            rate_window: DEFAULT_RATE_WINDOW,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
            rate_window: DEFAULT_RATE_WINDOW,
        }
    }

    #[must_use]
    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }
}

/// Counts requests sent since the last rate-window pause.
#[derive(Debug)]
pub struct RequestBudget {
    limit: u32,
    sent: AtomicU32,
}

impl RequestBudget {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            sent: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn sent(&self) -> u32 {
        self.sent.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.sent() >= self.limit
    }

    pub fn record(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.sent.store(0, Ordering::Relaxed);
    }
}

/// Blocking point for backoff and rate-limit pauses.
#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
