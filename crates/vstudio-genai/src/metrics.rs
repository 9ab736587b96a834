//! Generative service metrics.
//!
//! - Request counters by operation and status
//! - Latency histograms
//! - Job poll counter

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

pub mod names {
    /// Total requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "genai_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "genai_latency_seconds";

    /// Total job status polls by model.
    pub const POLLS_TOTAL: &str = "genai_polls_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a job status poll.
pub fn record_poll() {
    counter!(names::POLLS_TOTAL).increment(1);
}
