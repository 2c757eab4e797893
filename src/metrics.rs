//! Observability metrics for the scraper
//!
//! Request, retry and scrape outcomes are emitted through the `metrics` facade.
//! Without an installed recorder every call is a no-op, so the library can be
//! used without a metrics backend.
//!
//! ## Architecture
//!
//! - Uses `metrics` crate for low-overhead metric collection
//! - Optional Prometheus exporter for a scrape endpoint (e.g., :9090/metrics)
//! - Correlation IDs tie the debug lines of one request attempt together

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(false));

/// Correlation ID generator for request tracing
static CORRELATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Initialize metrics system with Prometheus exporter
///
/// Idempotent: later calls return `Ok(())` without rebinding.
///
/// # Arguments
/// * `addr` - Socket address to bind Prometheus scrape endpoint (e.g., "0.0.0.0:9090")
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.lock().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "openf1_requests_total",
        Unit::Count,
        "Total number of HTTP request attempts made to the OpenF1 API"
    );
    describe_histogram!(
        "openf1_request_duration_seconds",
        Unit::Seconds,
        "OpenF1 request attempt duration in seconds"
    );
    describe_counter!(
        "openf1_retries_total",
        Unit::Count,
        "Total number of retry attempts"
    );
    describe_histogram!(
        "openf1_retry_backoff_seconds",
        Unit::Seconds,
        "Duration of retry backoff in seconds"
    );
    describe_counter!(
        "sessions_scraped_total",
        Unit::Count,
        "Sessions aggregated into a document"
    );
    describe_counter!(
        "sessions_skipped_total",
        Unit::Count,
        "Sessions dropped because a mandatory resource failed"
    );
    describe_counter!(
        "meetings_scraped_total",
        Unit::Count,
        "Meetings assembled into a Grand Prix document"
    );
    describe_counter!(
        "meetings_failed_total",
        Unit::Count,
        "Meeting scrapes that returned a failed envelope"
    );

    *initialized = true;
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Check if the metrics exporter has been installed
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.lock().await
}

/// Generate a new correlation ID for request tracing
pub fn generate_correlation_id() -> String {
    let id = CORRELATION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("req-{id:08x}")
}

/// Timing and outcome of one request attempt
pub struct HttpRequestMetrics {
    endpoint: String,
    start_time: Instant,
    correlation_id: String,
    attempt: u32,
}

impl HttpRequestMetrics {
    /// Start recording a new request attempt
    pub fn start(endpoint: impl Into<String>, attempt: u32) -> Self {
        let endpoint = endpoint.into();
        let correlation_id = generate_correlation_id();

        debug!(
            correlation_id = %correlation_id,
            endpoint = %endpoint,
            attempt = attempt,
            "Starting OpenF1 request"
        );

        Self {
            endpoint,
            start_time: Instant::now(),
            correlation_id,
            attempt,
        }
    }

    /// Record an attempt that produced an HTTP status
    pub fn record_complete(&self, status_code: u16) {
        self.record(status_code.to_string());

        if status_code == 429 {
            warn!(
                correlation_id = %self.correlation_id,
                endpoint = %self.endpoint,
                attempt = self.attempt,
                "Rate limit response (429) from OpenF1"
            );
        }
    }

    /// Record an attempt that failed before any HTTP status arrived
    pub fn record_transport_error(&self, code: &'static str) {
        self.record(code.to_lowercase());
    }

    fn record(&self, status: String) {
        let duration = self.start_time.elapsed();

        counter!(
            "openf1_requests_total",
            "endpoint" => self.endpoint.clone(),
            "status" => status.clone(),
        )
        .increment(1);

        histogram!(
            "openf1_request_duration_seconds",
            "endpoint" => self.endpoint.clone(),
        )
        .record(duration.as_secs_f64());

        debug!(
            correlation_id = %self.correlation_id,
            endpoint = %self.endpoint,
            attempt = self.attempt,
            status = %status,
            duration_ms = duration.as_millis(),
            "OpenF1 request finished"
        );
    }

    /// Get the correlation ID for this attempt
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Record retry backoff duration
pub fn record_retry_backoff(endpoint: &str, duration: Duration, next_attempt: u32) {
    counter!("openf1_retries_total", "endpoint" => endpoint.to_string()).increment(1);
    histogram!("openf1_retry_backoff_seconds").record(duration.as_secs_f64());

    debug!(
        endpoint,
        next_attempt,
        backoff_ms = duration.as_millis(),
        "Retry backoff recorded"
    );
}

/// Record a session that made it into a document
pub fn record_session_scraped(session_name: &str) {
    counter!("sessions_scraped_total", "session" => session_name.to_string()).increment(1);
}

/// Record a session dropped from a document
pub fn record_session_skipped(session_name: &str, code: &'static str) {
    counter!(
        "sessions_skipped_total",
        "session" => session_name.to_string(),
        "error" => code,
    )
    .increment(1);
}

/// Meeting-level scrape metrics
pub struct MeetingMetrics {
    meeting_key: u32,
    start_time: Instant,
}

impl MeetingMetrics {
    /// Start tracking a meeting scrape
    pub fn start(meeting_key: u32) -> Self {
        Self {
            meeting_key,
            start_time: Instant::now(),
        }
    }

    /// Record an assembled document
    pub fn record_success(&self, sessions: usize) {
        counter!("meetings_scraped_total").increment(1);

        info!(
            meeting_key = self.meeting_key,
            sessions,
            duration_secs = self.start_time.elapsed().as_secs_f64(),
            "Meeting scrape completed"
        );
    }

    /// Record a failed meeting scrape
    pub fn record_failure(&self, code: &'static str) {
        counter!("meetings_failed_total", "error" => code).increment(1);

        warn!(
            meeting_key = self.meeting_key,
            error = code,
            duration_secs = self.start_time.elapsed().as_secs_f64(),
            "Meeting scrape failed"
        );
    }
}
