use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::backend::Backend;
use crate::errors::{BackendError, FailedAttempt, RouterError, RouterResult};
use crate::routing::pool::WorkerPool;
use crate::routing::selector::Selector;
use crate::routing::stats::{AttemptTracker, BackendStats};

/// Executes generation calls against selected backends
///
/// The primary attempt for each invocation runs as a unit of work on the
/// bounded worker pool. On failure the dispatcher walks the remaining
/// backends sequentially on the invoking task; failover attempts are never
/// pool-scheduled.
pub(crate) struct Dispatcher {
    backends: Vec<Backend>,
    selector: Selector,
    pool: WorkerPool,
    trackers: Vec<AttemptTracker>,
    attempt_timeout: Option<Duration>,
}

impl Dispatcher {
    /// # Parameters
    /// * `backends` - Ordered backend list; ids must match slice positions
    /// * `selector` - Selection logic (owns the round-robin cursor)
    /// * `pool` - Worker pool for primary attempts
    /// * `attempt_timeout` - Optional per-attempt deadline
    pub fn new(
        backends: Vec<Backend>,
        selector: Selector,
        pool: WorkerPool,
        attempt_timeout: Option<Duration>,
    ) -> Self {
        let trackers = backends.iter().map(|_| AttemptTracker::new()).collect();
        Self {
            backends,
            selector,
            pool,
            trackers,
            attempt_timeout,
        }
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn backend_stats(&self) -> Vec<BackendStats> {
        self.backends
            .iter()
            .zip(&self.trackers)
            .map(|(backend, tracker)| tracker.snapshot(backend))
            .collect()
    }

    /// Route one prompt: select a primary, run it on the pool, fail over on
    /// error
    pub async fn dispatch(&self, prompt: &str) -> RouterResult<String> {
        if self.pool.is_closed() {
            return Err(RouterError::Shutdown);
        }

        let primary = self.selector.select(&self.backends);
        debug!(
            "Dispatching prompt to backend '{}' (id {}, strategy {})",
            primary.name(),
            primary.id(),
            self.selector.strategy()
        );

        let started = Instant::now();
        let outcome = match self
            .pool
            .run(attempt_future(primary, prompt, self.attempt_timeout))
            .await
        {
            Ok(result) => result,
            // The pool was shut down after this invocation was accepted;
            // treated as a failed primary attempt, not a terminal error.
            Err(_) => Err(BackendError::Unavailable(
                "worker pool is shut down".to_string(),
            )),
        };
        let elapsed = started.elapsed();
        self.trackers[primary.id()].record(elapsed, &outcome);

        match outcome {
            Ok(text) => {
                debug!(
                    "Backend '{}' completed request in {:?}",
                    primary.name(),
                    elapsed
                );
                #[cfg(feature = "metrics")]
                crate::metrics::record_attempt_success(primary.name(), "primary", elapsed);
                Ok(text)
            }
            Err(err) => {
                warn!(
                    "Backend '{}' failed ({}), entering failover",
                    primary.name(),
                    err
                );
                #[cfg(feature = "metrics")]
                crate::metrics::record_attempt_failure(primary.name(), "primary", &err, elapsed);
                self.failover(prompt, primary.id(), primary.name(), err).await
            }
        }
    }

    /// Walk all other backends in configured order, invoking each directly
    /// on the calling task until one succeeds
    ///
    /// The failed primary is skipped by id, never by display name. A failure
    /// during the walk is recorded and the walk proceeds to the next
    /// candidate.
    async fn failover(
        &self,
        prompt: &str,
        failed_id: usize,
        failed_name: &str,
        primary_error: BackendError,
    ) -> RouterResult<String> {
        let mut attempts = vec![FailedAttempt {
            backend_id: failed_id,
            backend_name: failed_name.to_string(),
            error: primary_error,
        }];

        for candidate in self.backends.iter().filter(|b| b.id() != failed_id) {
            #[cfg(feature = "metrics")]
            crate::metrics::record_failover(candidate.name());

            let started = Instant::now();
            let result = attempt_future(candidate, prompt, self.attempt_timeout).await;
            let elapsed = started.elapsed();
            self.trackers[candidate.id()].record(elapsed, &result);

            match result {
                Ok(text) => {
                    info!(
                        "Failover to backend '{}' (id {}) succeeded",
                        candidate.name(),
                        candidate.id()
                    );
                    #[cfg(feature = "metrics")]
                    crate::metrics::record_attempt_success(candidate.name(), "failover", elapsed);
                    return Ok(text);
                }
                Err(err) => {
                    warn!(
                        "Failover attempt on backend '{}' (id {}) failed: {}",
                        candidate.name(),
                        candidate.id(),
                        err
                    );
                    #[cfg(feature = "metrics")]
                    crate::metrics::record_attempt_failure(candidate.name(), "failover", &err, elapsed);
                    attempts.push(FailedAttempt {
                        backend_id: candidate.id(),
                        backend_name: candidate.name().to_string(),
                        error: err,
                    });
                }
            }
        }

        error!(
            "All {} backend(s) failed for this invocation",
            self.backends.len()
        );
        #[cfg(feature = "metrics")]
        crate::metrics::record_exhaustion();
        Err(RouterError::FailoverExhausted(attempts))
    }
}

/// Build the future for one generation attempt
///
/// The future owns its inputs so it can be shipped to a pool worker; the
/// same future shape runs inline during the failover walk. When a deadline
/// is configured, expiry surfaces as a `BackendError::Timeout`.
fn attempt_future(
    backend: &Backend,
    prompt: &str,
    timeout: Option<Duration>,
) -> impl Future<Output = Result<String, BackendError>> + Send + 'static {
    let generator = backend.generator();
    let prompt = prompt.to_string();

    async move {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, generator.generate(&prompt)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(format!(
                    "no response within {}ms",
                    limit.as_millis()
                ))),
            },
            None => generator.generate(&prompt).await,
        }
    }
}
