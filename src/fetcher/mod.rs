//! Transport client, error taxonomy and resource accessors for the OpenF1 API

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

pub mod openf1_config;
pub mod openf1_http;
pub mod retry_formatter;
pub mod service;
pub mod shared_resources;
pub mod transport;

pub use openf1_http::OpenF1HttpClient;
pub use service::OpenF1Service;
pub use transport::{ReqwestTransport, TransportResponse};

/// Every failure the scraper can report, one variant per error kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetcherError {
    /// Attempt exceeded its time budget
    #[error("request timed out: {context}")]
    Timeout {
        /// Endpoint or URL that timed out
        context: String,
    },

    /// Connection could not be established or was interrupted
    #[error("network error for {context}: {message}")]
    NetworkError {
        /// Endpoint or URL
        context: String,
        /// Underlying transport message
        message: String,
    },

    /// Transport failure that fits no other category
    #[error("unknown transport error for {context}: {message}")]
    UnknownTransportError {
        /// Endpoint or URL
        context: String,
        /// Underlying transport message
        message: String,
    },

    /// HTTP 400
    #[error("bad request ({status} {status_text})")]
    BadRequest {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// HTTP 404
    #[error("resource not found ({status} {status_text})")]
    NotFound {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// HTTP 429
    #[error("rate limit exceeded ({status} {status_text})")]
    RateLimited {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// HTTP 500
    #[error("upstream server error ({status} {status_text})")]
    ServerError {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// HTTP 503
    #[error("service temporarily unavailable ({status} {status_text})")]
    ServiceUnavailable {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// Any other non-2xx status
    #[error("HTTP error {status}: {status_text}")]
    HttpError {
        /// Numeric status
        status: u16,
        /// Reason phrase
        status_text: String,
    },

    /// Every attempt failed
    #[error("giving up on {endpoint} after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Endpoint that kept failing
        endpoint: String,
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last: Box<FetcherError>,
    },

    /// Payload was not a JSON array, or its records did not decode
    #[error("invalid response for {context}: expected array, received {received}")]
    InvalidResponse {
        /// Resource being validated
        context: String,
        /// Shape actually received
        received: String,
    },

    /// Well-formed but empty where data is required
    #[error("no data: {message}")]
    NoData {
        /// What was missing
        message: String,
    },

    /// Meeting or session listing could not be resolved
    #[error("scrape failed during {stage}: {source}")]
    ScrapeFailed {
        /// Orchestration step that failed
        stage: String,
        /// First unresolved error
        source: Box<FetcherError>,
    },
}

impl FetcherError {
    /// Classify a non-2xx HTTP status
    pub fn from_status(status: u16, status_text: impl Into<String>) -> Self {
        let status_text = status_text.into();
        match status {
            400 => Self::BadRequest { status, status_text },
            404 => Self::NotFound { status, status_text },
            429 => Self::RateLimited { status, status_text },
            500 => Self::ServerError { status, status_text },
            503 => Self::ServiceUnavailable { status, status_text },
            _ => Self::HttpError { status, status_text },
        }
    }

    /// Wrap an error raised while resolving a meeting or its sessions
    pub fn scrape_failed(stage: impl Into<String>, source: FetcherError) -> Self {
        Self::ScrapeFailed {
            stage: stage.into(),
            source: Box::new(source),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "TIMEOUT",
            Self::NetworkError { .. } => "NETWORK_ERROR",
            Self::UnknownTransportError { .. } => "UNKNOWN_ERROR",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::RateLimited { .. } => "RATE_LIMIT",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::HttpError { .. } => "HTTP_ERROR",
            Self::RetryExhausted { .. } => "MAX_RETRIES_EXCEEDED",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
            Self::NoData { .. } => "NO_DATA",
            Self::ScrapeFailed { .. } => "SCRAPE_FAILED",
        }
    }

    /// HTTP status carried by status-level errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimited { status, .. }
            | Self::ServerError { status, .. }
            | Self::ServiceUnavailable { status, .. }
            | Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Innermost error, looking through exhaustion and scrape wrappers
    pub fn root_cause(&self) -> &FetcherError {
        match self {
            Self::RetryExhausted { last, .. } => last.root_cause(),
            Self::ScrapeFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    fn details(&self) -> Value {
        match self {
            Self::Timeout { context } => json!({ "context": context }),
            Self::NetworkError { context, message }
            | Self::UnknownTransportError { context, message } => {
                json!({ "context": context, "original_error": message })
            }
            Self::BadRequest { status, status_text }
            | Self::NotFound { status, status_text }
            | Self::RateLimited { status, status_text }
            | Self::ServerError { status, status_text }
            | Self::ServiceUnavailable { status, status_text }
            | Self::HttpError { status, status_text } => {
                json!({ "status": status, "status_text": status_text })
            }
            Self::RetryExhausted {
                endpoint,
                attempts,
                last,
            } => json!({ "endpoint": endpoint, "attempts": attempts, "last_error": last }),
            Self::InvalidResponse { context, received } => {
                json!({ "context": context, "received_type": received })
            }
            Self::NoData { .. } => Value::Null,
            Self::ScrapeFailed { stage, source } => json!({ "stage": stage, "cause": source }),
        }
    }
}

/// Serialized as `{code, message, details}` inside envelopes and output files
impl Serialize for FetcherError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FetcherError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("details", &self.details())?;
        state.end()
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Single-shot HTTP GET against the upstream API
///
/// Implementations perform exactly one request and never retry; retry, timeout and
/// status classification live in [`OpenF1HttpClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET request
    ///
    /// # Arguments
    /// * `url` - Fully-qualified resource URL
    /// * `params` - Equality filters appended as query parameters
    ///
    /// # Errors
    /// Returns a transport-level [`FetcherError`] when no HTTP response was received
    async fn get(&self, url: &str, params: &[(String, String)]) -> FetcherResult<TransportResponse>;
}
