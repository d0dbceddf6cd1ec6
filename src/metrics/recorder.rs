//! Metric recording functions

use std::time::Duration;

use crate::errors::BackendError;

use super::{labels, names};

/// Record a successful backend attempt
pub fn record_attempt_success(backend: &str, attempt: &str, duration: Duration) {
    metrics::counter!(
        names::ATTEMPTS_TOTAL,
        labels::keys::BACKEND => backend.to_string(),
        labels::keys::ATTEMPT => attempt.to_string()
    )
    .increment(1);

    metrics::histogram!(
        names::ATTEMPT_DURATION,
        labels::keys::BACKEND => backend.to_string(),
        labels::keys::ATTEMPT => attempt.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a failed backend attempt
pub fn record_attempt_failure(
    backend: &str,
    attempt: &str,
    error: &BackendError,
    duration: Duration,
) {
    // Failures still count as attempts.
    metrics::counter!(
        names::ATTEMPTS_TOTAL,
        labels::keys::BACKEND => backend.to_string(),
        labels::keys::ATTEMPT => attempt.to_string()
    )
    .increment(1);

    metrics::histogram!(
        names::ATTEMPT_DURATION,
        labels::keys::BACKEND => backend.to_string(),
        labels::keys::ATTEMPT => attempt.to_string()
    )
    .record(duration.as_secs_f64());

    metrics::counter!(
        names::ERRORS_TOTAL,
        labels::keys::BACKEND => backend.to_string(),
        labels::keys::ERROR_TYPE => labels::error_type_label(error).to_string()
    )
    .increment(1);
}

/// Record one failover attempt against the given candidate
pub fn record_failover(backend: &str) {
    metrics::counter!(
        names::FAILOVERS_TOTAL,
        labels::keys::BACKEND => backend.to_string()
    )
    .increment(1);
}

/// Record an invocation that failed on every configured backend
pub fn record_exhaustion() {
    metrics::counter!(names::EXHAUSTED_TOTAL).increment(1);
}
