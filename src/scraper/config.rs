//! Client configuration and retry constants

use std::time::Duration;

use crate::fetcher::openf1_config::OPENF1_BASE_URL;

/// Attempts per request, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles for every further attempt.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Per-attempt time budget.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay to wait before `next_attempt` (1-based).
///
/// No delay precedes the first attempt; attempt `n >= 2` waits `base_delay * 2^(n-2)`.
pub fn calculate_backoff(base_delay: Duration, next_attempt: u32) -> Duration {
    if next_attempt < 2 {
        return Duration::ZERO;
    }
    let factor = 2u32.saturating_pow(next_attempt - 2);
    base_delay.saturating_mul(factor)
}

/// Settings for [`crate::fetcher::OpenF1HttpClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without a trailing resource path
    pub base_url: String,
    /// Time budget for a single attempt
    pub timeout: Duration,
    /// Attempts per request (at least 1)
    pub max_attempts: u32,
    /// Backoff base delay
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: OPENF1_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Override the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the number of attempts; clamped to at least one
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the backoff base delay
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
