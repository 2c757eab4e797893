//! Uniform success/error envelope
//!
//! Every accessor and orchestrator operation returns a [`ScrapeResult`] rather than
//! raising: the caller always gets a success flag, the payload or a classified
//! error, and the time the outcome was produced.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fetcher::{FetcherError, FetcherResult};

/// Outcome of a scraper operation
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult<T> {
    /// Whether `data` holds the payload
    pub success: bool,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Classified error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetcherError>,
    /// When the outcome was produced
    pub timestamp: DateTime<Utc>,
}

impl<T> ScrapeResult<T> {
    /// Successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Failed envelope
    pub fn err(error: FetcherError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Unwrap into a `Result`, for callers that prefer `?`
    pub fn into_result(self) -> FetcherResult<T> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(FetcherError::NoData {
                message: "envelope carried neither data nor error".to_string(),
            }),
        }
    }

    /// Transform the payload, keeping the timestamp
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScrapeResult<U> {
        ScrapeResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            timestamp: self.timestamp,
        }
    }
}

impl<T> From<FetcherResult<T>> for ScrapeResult<T> {
    fn from(result: FetcherResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}
