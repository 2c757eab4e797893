//! Production [`Transport`] backed by `reqwest`

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use super::shared_resources::global_http_client;
use super::{FetcherError, FetcherResult, Transport};

/// Raw outcome of one HTTP exchange, before status classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric HTTP status
    pub status: u16,
    /// Reason phrase (e.g., "Not Found")
    pub status_text: String,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Bodyless response with the given status
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: String::new(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport using a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Arc<Client>,
}

impl ReqwestTransport {
    /// Create a transport over an existing client
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(global_http_client())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> FetcherResult<TransportResponse> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, &e))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, &e))?;

        debug!(url, status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// Map a `reqwest` failure onto the transport-level error kinds
pub fn classify_reqwest_error(context: &str, err: &reqwest::Error) -> FetcherError {
    if err.is_timeout() {
        return FetcherError::Timeout {
            context: context.to_string(),
        };
    }

    if err.is_connect() || err.is_request() {
        return FetcherError::NetworkError {
            context: context.to_string(),
            message: err.to_string(),
        };
    }

    FetcherError::UnknownTransportError {
        context: context.to_string(),
        message: err.to_string(),
    }
}
