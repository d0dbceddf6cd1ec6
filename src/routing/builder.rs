use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::backend::{Backend, TextGenerator};
use crate::config::Settings;
use crate::constants;
use crate::errors::{RouterError, RouterResult};
use crate::routing::dispatcher::Dispatcher;
use crate::routing::pool::WorkerPool;
use crate::routing::router::LlmRouter;
use crate::routing::selector::{RoutingStrategy, Selector};

/// Internal helper struct for the builder
struct PendingBackend {
    name: String,
    weight: u32,
    generator: Arc<dyn TextGenerator + Send + Sync>,
}

/// LlmRouter builder
///
/// Collects backends in configuration order, then validates and assembles
/// the router in [`build`](RouterBuilder::build). No partial router is ever
/// created: an empty backend list or a zero weight fails the whole build.
pub struct RouterBuilder {
    backends_to_build: Vec<PendingBackend>,
    strategy: RoutingStrategy,
    pool_factor: usize,
    attempt_timeout: Option<Duration>,
    selector_seed: Option<u64>,
}

impl RouterBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        RouterBuilder {
            backends_to_build: Vec::new(),
            strategy: RoutingStrategy::RoundRobin,
            pool_factor: constants::DEFAULT_POOL_FACTOR,
            attempt_timeout: None,
            selector_seed: None,
        }
    }

    /// Sets the routing strategy for the router.
    pub fn strategy(mut self, strategy: RoutingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Adds a backend in configuration order.
    ///
    /// Order matters: it drives round-robin cycling and the failover walk.
    pub fn add_backend(
        mut self,
        name: impl Into<String>,
        weight: u32,
        generator: impl TextGenerator + Send + Sync + 'static,
    ) -> Self {
        self.backends_to_build.push(PendingBackend {
            name: name.into(),
            weight,
            generator: Arc::new(generator),
        });
        self
    }

    /// Adds a backend sharing an existing generation capability.
    pub fn add_shared_backend(
        mut self,
        name: impl Into<String>,
        weight: u32,
        generator: Arc<dyn TextGenerator + Send + Sync>,
    ) -> Self {
        self.backends_to_build.push(PendingBackend {
            name: name.into(),
            weight,
            generator,
        });
        self
    }

    /// Sets the worker pool size as a multiple of the backend count.
    ///
    /// The pool holds `max(1, backend_count * factor)` concurrent primary
    /// attempts. This is a tunable concurrency ceiling, not a hard limit on
    /// throughput.
    pub fn pool_factor(mut self, factor: usize) -> Self {
        self.pool_factor = factor;
        self
    }

    /// Sets a per-attempt deadline; expiry is treated as a backend failure.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Seeds the weighted-selection random source for deterministic tests.
    pub fn selector_seed(mut self, seed: u64) -> Self {
        self.selector_seed = Some(seed);
        self
    }

    /// Applies settings loaded from a TOML configuration.
    ///
    /// Returns an error if the settings carry an unknown strategy name or an
    /// invalid pool factor.
    pub fn with_settings(mut self, settings: &Settings) -> RouterResult<Self> {
        self.strategy = settings.routing_strategy()?;
        if settings.pool_factor == 0 {
            return Err(RouterError::Config(
                "pool_factor must be at least 1".to_string(),
            ));
        }
        self.pool_factor = settings.pool_factor;
        self.attempt_timeout = settings.attempt_timeout_ms.map(Duration::from_millis);
        Ok(self)
    }

    /// Consumes the builder and constructs the `LlmRouter`.
    pub fn build(self) -> RouterResult<LlmRouter> {
        if self.backends_to_build.is_empty() {
            return Err(RouterError::Config(
                "at least one backend is required".to_string(),
            ));
        }

        for pending in &self.backends_to_build {
            if pending.weight == 0 {
                return Err(RouterError::Config(format!(
                    "backend '{}' has weight 0, weights must be at least 1",
                    pending.name
                )));
            }
        }

        let backends: Vec<Backend> = self
            .backends_to_build
            .into_iter()
            .enumerate()
            .map(|(id, pending)| Backend::new(id, pending.name, pending.weight, pending.generator))
            .collect();

        let capacity = (backends.len() * self.pool_factor).max(1);
        let selector = match self.selector_seed {
            Some(seed) => Selector::seeded(self.strategy, seed),
            None => Selector::new(self.strategy),
        };

        debug!(
            "Built router with {} backend(s), strategy {}, pool capacity {}",
            backends.len(),
            self.strategy,
            capacity
        );

        Ok(LlmRouter::from_dispatcher(Dispatcher::new(
            backends,
            selector,
            WorkerPool::new(capacity),
            self.attempt_timeout,
        )))
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
