//! Retry message formatting for the OpenF1 HTTP client.
//!
//! Keeps retry, recovery and failure log lines consistent so operators can follow
//! a single request across attempts.

use std::time::Duration;

use super::FetcherError;

/// User-facing description of an error kind, used inside retry messages.
pub fn describe(error: &FetcherError) -> &'static str {
    match error.root_cause() {
        FetcherError::Timeout { .. } => "request timeout",
        FetcherError::NetworkError { .. } => "connection failed",
        FetcherError::UnknownTransportError { .. } => "unexpected transport error",
        FetcherError::BadRequest { .. } => "bad request",
        FetcherError::NotFound { .. } => "resource not found",
        FetcherError::RateLimited { .. } => "rate limit exceeded",
        FetcherError::ServerError { .. } => "internal server error",
        FetcherError::ServiceUnavailable { .. } => "service unavailable",
        FetcherError::HttpError { .. } => "HTTP error",
        FetcherError::InvalidResponse { .. } => "invalid response",
        FetcherError::NoData { .. } => "no data",
        FetcherError::RetryExhausted { .. } | FetcherError::ScrapeFailed { .. } => "request failed",
    }
}

/// Suggested remediation presented after the final attempt fails.
pub fn suggestion(error: &FetcherError) -> &'static str {
    match error.root_cause() {
        FetcherError::Timeout { .. } => "Check your network connection or raise --timeout-secs",
        FetcherError::NetworkError { .. } => "Verify internet connectivity and DNS resolution",
        FetcherError::RateLimited { .. } => "Wait a minute before scraping again or scrape fewer sessions",
        FetcherError::ServerError { .. } | FetcherError::ServiceUnavailable { .. } => {
            "OpenF1 may be experiencing issues, try again later"
        }
        FetcherError::BadRequest { .. } | FetcherError::NotFound { .. } => {
            "Check the meeting key, year and base URL"
        }
        _ => "Check network connectivity and try again",
    }
}

/// Context for formatting retry messages.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Attempt that just failed (1-based)
    pub attempt: u32,
    /// Maximum number of attempts configured
    pub max_attempts: u32,
    /// Backoff duration until the next attempt
    pub backoff_duration: Duration,
    /// Resource path that failed (e.g., "session_result")
    pub endpoint: String,
}

impl RetryContext {
    /// Convenience constructor used throughout the retry loop.
    pub fn new(
        attempt: u32,
        max_attempts: u32,
        backoff_duration: Duration,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            attempt,
            max_attempts,
            backoff_duration,
            endpoint: endpoint.into(),
        }
    }

    /// Format standardized retry message with attempt counters and wait time.
    pub fn format_retry(&self, error: &FetcherError) -> String {
        format!(
            "Attempt {}/{} for {} failed ({}) - retrying in {:.1} seconds...",
            self.attempt,
            self.max_attempts,
            self.endpoint,
            describe(error),
            self.backoff_duration.as_secs_f64()
        )
    }

    /// Format recovery message when a later attempt works.
    pub fn format_success(&self) -> String {
        format!(
            "Attempt {}/{} for {} succeeded after retry",
            self.attempt, self.max_attempts, self.endpoint
        )
    }

    /// Format final failure summary with a suggestion.
    pub fn format_failure(&self, error: &FetcherError) -> String {
        [
            format!(
                "[FAILED] {} failed after {} attempts",
                self.endpoint, self.max_attempts
            ),
            format!("  Last error: {error}"),
            format!("  Suggestion: {}", suggestion(error)),
        ]
        .join("\n")
    }
}
