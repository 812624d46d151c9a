//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all AcadFlow metrics
pub const METRICS_PREFIX: &str = "acadflow";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 150ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.075,  // 75ms
    0.100,  // 100ms
    0.150,  // 150ms - P99 target
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Workflow metrics
    describe_counter!(
        format!("{}_stage_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Total FYP stage transitions applied"
    );

    describe_counter!(
        format!("{}_invalid_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Total FYP stage transitions rejected"
    );

    describe_counter!(
        format!("{}_clearance_decisions_total", METRICS_PREFIX),
        Unit::Count,
        "Total clearance approve/reject decisions"
    );

    describe_counter!(
        format!("{}_notifications_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total notifications written"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record a stage transition outcome
pub fn record_stage_transition(from: &str, to: &str, accepted: bool) {
    if accepted {
        counter!(
            format!("{}_stage_transitions_total", METRICS_PREFIX),
            "from" => from.to_string(),
            "to" => to.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_invalid_transitions_total", METRICS_PREFIX),
            "from" => from.to_string(),
            "to" => to.to_string()
        )
        .increment(1);
    }
}

/// Helper to record a clearance decision
pub fn record_clearance_decision(department: &str, decision: &str) {
    counter!(
        format!("{}_clearance_decisions_total", METRICS_PREFIX),
        "department" => department.to_string(),
        "decision" => decision.to_string()
    )
    .increment(1);
}

/// Helper to record a notification write
pub fn record_notification() {
    counter!(format!("{}_notifications_created_total", METRICS_PREFIX)).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        // Verify buckets are sorted and contain SLO targets
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }

        // P50 target (50ms) should be in buckets
        assert!(LATENCY_BUCKETS.contains(&0.050));
        // P99 target (150ms) should be in buckets
        assert!(LATENCY_BUCKETS.contains(&0.150));
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("PUT", "/api/v1/fyps/{id}/stage");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(200);
        // Just verify it runs without panic
    }
}
