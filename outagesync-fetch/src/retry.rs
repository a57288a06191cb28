//! Retry policy for API requests.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

/// Default cap on a single backoff delay.
const DEFAULT_MAX_BACKOFF_SECS: u64 = 60;

/// Policy deciding whether and when a failed request is resent.
///
/// Attempt `n` (0-based) that fails with a retry-eligible outcome waits
/// `backoff_factor * 2^n` seconds, capped at `max_backoff`, before the next
/// attempt. At most `max_retries` extra attempts are made.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay in seconds.
    pub backoff_factor: f64,
    /// Maximum delay between attempts.
    pub max_backoff: Duration,
    /// Status codes that trigger a retry.
    pub retry_statuses: BTreeSet<u16>,
    /// Whether connect errors and timeouts are retried.
    pub retry_on_network_error: bool,
}

impl RetryPolicy {
    /// Creates a policy retrying server errors (500) `max_retries` times.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            retry_statuses: BTreeSet::from([500]),
            retry_on_network_error: true,
        }
    }

    /// Disables retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_factor: 0.0,
            max_backoff: Duration::ZERO,
            retry_statuses: BTreeSet::new(),
            retry_on_network_error: false,
        }
    }

    /// Sets the backoff factor in seconds.
    pub fn with_backoff_factor(mut self, secs: f64) -> Self {
        self.backoff_factor = secs;
        self
    }

    /// Sets the maximum delay between attempts.
    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }

    /// Replaces the set of retry-eligible status codes.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }

    /// Enables or disables retries on network errors.
    pub fn with_network_retries(mut self, enabled: bool) -> Self {
        self.retry_on_network_error = enabled;
        self
    }

    /// Calculates the delay after the given failed attempt (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if self.backoff_factor.is_nan() || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);

        Duration::try_from_secs_f64(secs)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }

    /// Determines if a response status should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Determines if a request error should be retried.
    pub fn should_retry_error(&self, error: &reqwest::Error) -> bool {
        self.retry_on_network_error && (error.is_connect() || error.is_timeout())
    }

    /// Returns true if `attempt` (0-based) may be followed by another one.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

// ============================================================================
// Sleeper
// ============================================================================

/// Waits between retry attempts.
///
/// Injected into the client so tests can observe delays without waiting.
#[async_trait]
pub trait Sleeper: fmt::Debug + Send + Sync {
    /// Sleeps for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
