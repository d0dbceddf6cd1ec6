//! Metrics module for RelayLLM
//!
//! This module provides optional metrics emission for monitoring routing
//! decisions and backend health. Enable with the `metrics` feature flag.
//!
//! The crate only emits through the `metrics` facade; exporter setup
//! (Prometheus, StatsD, ...) is the application's concern.
//!
//! # Example
//!
//! ```ignore
//! use relayllm::metrics::describe_metrics;
//!
//! // User sets up their preferred exporter first, then:
//! describe_metrics();
//! ```

pub mod labels;
mod recorder;

pub use recorder::*;

/// Metric name constants
pub mod names {
    /// Total number of backend generation attempts
    pub const ATTEMPTS_TOTAL: &str = "router_attempts_total";
    /// Attempt duration in seconds
    pub const ATTEMPT_DURATION: &str = "router_attempt_duration_seconds";
    /// Total number of failed attempts by error type
    pub const ERRORS_TOTAL: &str = "router_errors_total";
    /// Total number of failover attempts
    pub const FAILOVERS_TOTAL: &str = "router_failovers_total";
    /// Total number of invocations that exhausted every backend
    pub const EXHAUSTED_TOTAL: &str = "router_failover_exhausted_total";
}

/// Describe all metrics with their units and descriptions.
/// Call this after setting up your metrics exporter for better discovery.
pub fn describe_metrics() {
    use metrics::{describe_counter, describe_histogram, Unit};

    describe_counter!(
        names::ATTEMPTS_TOTAL,
        Unit::Count,
        "Total number of backend generation attempts"
    );
    describe_histogram!(
        names::ATTEMPT_DURATION,
        Unit::Seconds,
        "Attempt duration in seconds"
    );
    describe_counter!(
        names::ERRORS_TOTAL,
        Unit::Count,
        "Total number of failed attempts by error type"
    );
    describe_counter!(
        names::FAILOVERS_TOTAL,
        Unit::Count,
        "Total number of failover attempts"
    );
    describe_counter!(
        names::EXHAUSTED_TOTAL,
        Unit::Count,
        "Total number of invocations that exhausted every backend"
    );
}
