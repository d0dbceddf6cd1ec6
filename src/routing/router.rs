use std::sync::Arc;

use futures::future::join_all;
use log::info;
use tokio::task::JoinHandle;

use crate::backend::Backend;
use crate::errors::{RouterError, RouterResult};
use crate::routing::builder::RouterBuilder;
use crate::routing::dispatcher::Dispatcher;
use crate::routing::pool::RouterState;
use crate::routing::selector::RoutingStrategy;
use crate::routing::stats::BackendStats;

/// Request router distributing generation calls across a fixed backend pool
///
/// Owns the backend set, the selector, the dispatcher and the worker pool.
/// Cheap to clone-share across tasks via the internal `Arc`.
pub struct LlmRouter {
    dispatcher: Arc<Dispatcher>,
}

impl LlmRouter {
    /// Creates a builder for configuring a router.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Route one prompt and wait for the result
    ///
    /// Suspends the calling task until the primary attempt (and, if needed,
    /// the failover walk) completes. Returns the generated text, or
    /// [`RouterError::FailoverExhausted`] when every backend failed, or
    /// [`RouterError::Shutdown`] when called after [`shutdown`](Self::shutdown).
    pub async fn invoke(&self, prompt: &str) -> RouterResult<String> {
        self.dispatcher.dispatch(prompt).await
    }

    /// Route one prompt without blocking the calling task
    ///
    /// The returned handle resolves to the same result type as
    /// [`invoke`](Self::invoke), with identical selection and failover
    /// semantics. After shutdown the handle resolves immediately with
    /// [`RouterError::Shutdown`].
    pub fn invoke_async(&self, prompt: impl Into<String>) -> InvocationHandle {
        let dispatcher = Arc::clone(&self.dispatcher);
        let prompt = prompt.into();
        InvocationHandle {
            task: tokio::spawn(async move { dispatcher.dispatch(&prompt).await }),
        }
    }

    /// Route a batch of prompts concurrently
    ///
    /// Each prompt is routed independently (own selection, own failover);
    /// the worker pool bounds how many primary attempts run at once.
    /// Results are returned in prompt order.
    pub async fn invoke_concurrently(&self, prompts: Vec<String>) -> Vec<RouterResult<String>> {
        join_all(prompts.iter().map(|prompt| self.invoke(prompt))).await
    }

    /// Stop accepting new work
    ///
    /// In-flight invocations may complete; subsequent calls to
    /// [`invoke`](Self::invoke) or [`invoke_async`](Self::invoke_async) fail
    /// fast with [`RouterError::Shutdown`]. Idempotent.
    pub fn shutdown(&self) {
        if !self.dispatcher.pool().is_closed() {
            info!("Router shutting down, rejecting new invocations");
        }
        self.dispatcher.pool().close();
    }

    /// Current lifecycle state (Running → ShuttingDown → Terminated)
    pub fn state(&self) -> RouterState {
        self.dispatcher.pool().state()
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.dispatcher.selector().strategy()
    }

    pub fn backend_count(&self) -> usize {
        self.dispatcher.backends().len()
    }

    pub fn backends(&self) -> &[Backend] {
        self.dispatcher.backends()
    }

    /// Per-backend attempt statistics, in configuration order
    pub fn backend_stats(&self) -> Vec<BackendStats> {
        self.dispatcher.backend_stats()
    }
}

impl Clone for LlmRouter {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

/// Handle to an in-flight asynchronous invocation
pub struct InvocationHandle {
    task: JoinHandle<RouterResult<String>>,
}

impl InvocationHandle {
    /// Wait for the invocation to finish and return its result
    pub async fn join(self) -> RouterResult<String> {
        match self.task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // Aborted; only happens while the runtime itself tears down.
            Err(_) => Err(RouterError::Shutdown),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
