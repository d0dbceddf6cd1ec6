use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

/// Lifecycle state of a router's worker pool
///
/// Transitions are one-directional:
/// Running → ShuttingDown → Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// Accepting new invocations
    Running,
    /// `shutdown()` was called; in-flight work may complete, new submissions
    /// are rejected
    ShuttingDown,
    /// All in-flight work has drained
    Terminated,
}

/// Returned when the pool refuses new work because it was closed
#[derive(Debug)]
pub(crate) struct PoolClosed;

/// Bounded pool of parallel workers
///
/// Each unit of work takes an owned semaphore permit and runs on its own
/// task, so at most `capacity` units are in flight at once. Saturation
/// queues callers on the semaphore; closing the pool rejects new
/// submissions immediately while letting permit holders finish.
pub(crate) struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run a unit of work on the pool and wait for its result
    ///
    /// Queues while the pool is saturated. Returns `Err(PoolClosed)` if the
    /// pool was shut down before a permit could be acquired.
    pub async fn run<F, T>(&self, work: F) -> Result<T, PoolClosed>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return Err(PoolClosed),
        };

        let worker = tokio::spawn(async move {
            let _permit = permit;
            work.await
        });

        match worker.await {
            Ok(value) => Ok(value),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // Task aborted; only happens while the runtime itself tears down.
            Err(_) => Err(PoolClosed),
        }
    }

    /// Stop accepting new work; idempotent
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Derive the lifecycle state from the semaphore: a closed pool is
    /// ShuttingDown until every outstanding permit has been returned
    pub fn state(&self) -> RouterState {
        if !self.semaphore.is_closed() {
            RouterState::Running
        } else if self.semaphore.available_permits() < self.capacity {
            RouterState::ShuttingDown
        } else {
            RouterState::Terminated
        }
    }
}
