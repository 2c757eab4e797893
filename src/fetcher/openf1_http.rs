//! OpenF1 HTTP client
//!
//! Wraps a [`Transport`] with:
//! - Per-attempt timeout
//! - Retry with exponential backoff for transport failures and HTTP error statuses alike
//! - Status classification into [`FetcherError`]
//! - Caller-invoked array shape validation
//!
//! Each call to [`OpenF1HttpClient::get`] is an independent future. Backoff sleeps
//! suspend only that call, so a concurrent sibling request keeps running.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::openf1_config::resource_url;
use super::retry_formatter::RetryContext;
use super::transport::ReqwestTransport;
use super::{FetcherError, FetcherResult, Transport};
use crate::metrics::{record_retry_backoff, HttpRequestMetrics};
use crate::scraper::config::{calculate_backoff, ClientConfig};

/// Retrying, timeout-aware GET client for the OpenF1 API
#[derive(Clone)]
pub struct OpenF1HttpClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration,
}

impl OpenF1HttpClient {
    /// Create a client over an explicit transport
    ///
    /// # Arguments
    /// * `transport` - Wire implementation, shared between clones
    /// * `config` - Base URL, timeout and retry settings
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }

    /// Create a client over the shared `reqwest` client
    pub fn with_config(config: &ClientConfig) -> Self {
        Self::new(Arc::new(ReqwestTransport::default()), config)
    }

    /// Attempts made per request
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// API root used to build request URLs
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request and parse the body as JSON
    ///
    /// # Arguments
    /// * `endpoint` - Resource path (e.g., "meetings")
    /// * `params` - Equality filters as key-value pairs
    ///
    /// # Errors
    /// Returns [`FetcherError::RetryExhausted`] carrying the final attempt's error
    /// once every attempt has failed.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<Value> {
        let url = resource_url(&self.base_url, endpoint);
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        debug!("GET {} with {} params", url, params.len());

        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let backoff = calculate_backoff(self.retry_delay, attempt);
                record_retry_backoff(endpoint, backoff, attempt);
                sleep(backoff).await;
            }

            match self.attempt_once(endpoint, &url, &params, attempt).await {
                Ok(payload) => {
                    if attempt > 1 {
                        let ctx = RetryContext::new(attempt, self.max_attempts, Duration::ZERO, endpoint);
                        info!("{}", ctx.format_success());
                    }
                    return Ok(payload);
                }
                Err(err) => {
                    if attempt < self.max_attempts {
                        let ctx = RetryContext::new(
                            attempt,
                            self.max_attempts,
                            calculate_backoff(self.retry_delay, attempt + 1),
                            endpoint,
                        );
                        warn!("{}", ctx.format_retry(&err));
                    }
                    last_error = Some(err);
                }
            }
        }

        let last = last_error.unwrap_or_else(|| FetcherError::UnknownTransportError {
            context: endpoint.to_string(),
            message: "no attempt was made".to_string(),
        });

        let ctx = RetryContext::new(self.max_attempts, self.max_attempts, Duration::ZERO, endpoint);
        error!("{}", ctx.format_failure(&last));

        Err(FetcherError::RetryExhausted {
            endpoint: endpoint.to_string(),
            attempts: self.max_attempts,
            last: Box::new(last),
        })
    }

    /// One bounded attempt: send, classify status, parse JSON
    async fn attempt_once(
        &self,
        endpoint: &str,
        url: &str,
        params: &[(String, String)],
        attempt: u32,
    ) -> FetcherResult<Value> {
        let metrics = HttpRequestMetrics::start(endpoint, attempt);

        let outcome = match timeout(self.timeout, self.transport.get(url, params)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetcherError::Timeout {
                context: url.to_string(),
            }),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                metrics.record_transport_error(err.code());
                return Err(err);
            }
        };

        metrics.record_complete(response.status);

        if !response.is_success() {
            return Err(FetcherError::from_status(
                response.status,
                response.status_text,
            ));
        }

        serde_json::from_str(&response.body).map_err(|e| FetcherError::UnknownTransportError {
            context: url.to_string(),
            message: format!("malformed JSON body: {e}"),
        })
    }
}

/// Require a payload to be a JSON array
///
/// Never coerces: an object, string, number, boolean or null fails with
/// [`FetcherError::InvalidResponse`] naming the received shape.
pub fn validate_array(payload: Value, context: &str) -> FetcherResult<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        other => Err(FetcherError::InvalidResponse {
            context: context.to_string(),
            received: json_type_name(&other).to_string(),
        }),
    }
}

/// Shape descriptor for a JSON value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
