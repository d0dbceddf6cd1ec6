use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::backend::Backend;
use crate::errors::BackendError;

/// Per-backend attempt counters
///
/// Backends are shared read-only across concurrent invocations, so the
/// counters are atomics rather than fields behind a lock.
pub(crate) struct AttemptTracker {
    request_count: AtomicUsize,
    error_count: AtomicUsize,
    total_elapsed_ms: AtomicU64,
}

impl AttemptTracker {
    pub fn new() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            error_count: AtomicUsize::new(0),
            total_elapsed_ms: AtomicU64::new(0),
        }
    }

    /// Record the outcome of one attempt against this backend
    pub fn record(&self, elapsed: Duration, result: &Result<String, BackendError>) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_elapsed_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
        if result.is_err() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, backend: &Backend) -> BackendStats {
        let request_count = self.request_count.load(Ordering::Relaxed);
        let error_count = self.error_count.load(Ordering::Relaxed);
        let total_ms = self.total_elapsed_ms.load(Ordering::Relaxed);

        BackendStats {
            backend_id: backend.id(),
            backend_name: backend.name().to_string(),
            request_count,
            error_count,
            error_rate: if request_count > 0 {
                (error_count as f64 / request_count as f64) * 100.0
            } else {
                0.0
            },
            avg_response_time_ms: if request_count > 0 {
                total_ms / request_count as u64
            } else {
                0
            },
        }
    }
}

/// Snapshot of one backend's attempt statistics
#[derive(Debug, Clone, Serialize)]
pub struct BackendStats {
    pub backend_id: usize,
    pub backend_name: String,
    pub request_count: usize,
    pub error_count: usize,
    /// Error rate from 0.0 to 100.0
    pub error_rate: f64,
    pub avg_response_time_ms: u64,
}
