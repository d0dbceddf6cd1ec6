use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::Backend;
use crate::errors::RouterError;

/// Routing strategy for selecting which backend serves a call
///
/// Chosen once at router construction and immutable for the router's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// Cycle through backends in configured order
    RoundRobin,
    /// Random selection with probability proportional to backend weight
    Weighted,
    /// Always the first configured backend; failover provides the rest
    Failover,
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingStrategy::RoundRobin => write!(f, "round_robin"),
            RoutingStrategy::Weighted => write!(f, "weighted"),
            RoutingStrategy::Failover => write!(f, "failover"),
        }
    }
}

impl FromStr for RoutingStrategy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round_robin" => Ok(RoutingStrategy::RoundRobin),
            "weighted" => Ok(RoutingStrategy::Weighted),
            "failover" => Ok(RoutingStrategy::Failover),
            other => Err(RouterError::Config(format!(
                "Unknown strategy '{}'\n  → Valid strategies: round_robin, weighted, failover",
                other
            ))),
        }
    }
}

/// Source of randomness for the weighted strategy
///
/// Thread-local by default; a seeded generator can be injected for
/// deterministic selection in tests.
enum RandomSource {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Pure selection logic choosing one backend per invocation
///
/// Owns the round-robin cursor, the only mutable routing state. The cursor
/// is a wrapping counter reduced modulo the backend count at read time, so
/// it never biases selection over long runs.
pub struct Selector {
    strategy: RoutingStrategy,
    cursor: AtomicUsize,
    random: RandomSource,
}

impl Selector {
    /// Creates a selector using thread-local randomness
    pub fn new(strategy: RoutingStrategy) -> Self {
        Self {
            strategy,
            cursor: AtomicUsize::new(0),
            random: RandomSource::Thread,
        }
    }

    /// Creates a selector with a seeded random source for deterministic tests
    pub fn seeded(strategy: RoutingStrategy, seed: u64) -> Self {
        Self {
            strategy,
            cursor: AtomicUsize::new(0),
            random: RandomSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    /// Select a backend from the given candidates
    ///
    /// # Parameters
    /// * `backends` - Ordered backend list (configuration order)
    ///
    /// # Returns
    /// * The selected backend
    ///
    /// # Panics
    /// Panics if `backends` is empty. The router builder rejects empty
    /// backend lists, so this cannot happen through the public API.
    pub fn select<'a>(&self, backends: &'a [Backend]) -> &'a Backend {
        if backends.is_empty() {
            panic!("Selector::select called with empty backend slice");
        }

        match self.strategy {
            RoutingStrategy::RoundRobin => {
                // Wrapping counter; modulo applied at read time, not storage time.
                let index = self.cursor.fetch_add(1, Ordering::Relaxed) % backends.len();
                debug!(
                    "RoundRobin: selected index {} ('{}') from {} backends",
                    index,
                    backends[index].name(),
                    backends.len()
                );
                &backends[index]
            }
            RoutingStrategy::Weighted => self.select_weighted(backends),
            RoutingStrategy::Failover => {
                debug!("Failover: selected primary '{}'", backends[0].name());
                &backends[0]
            }
        }
    }

    /// Weighted draw: uniform r in [0, W), first backend whose cumulative
    /// weight exceeds r, walking in configured order
    fn select_weighted<'a>(&self, backends: &'a [Backend]) -> &'a Backend {
        let total: u64 = backends.iter().map(|b| u64::from(b.weight())).sum();
        let draw = self.draw(total);

        let mut cumulative = 0u64;
        for backend in backends {
            cumulative += u64::from(backend.weight());
            if draw < cumulative {
                debug!(
                    "Weighted: drew {} of {}, selected '{}' (weight {})",
                    draw,
                    total,
                    backend.name(),
                    backend.weight()
                );
                return backend;
            }
        }

        // Weights are >= 1, so the walk above always returns.
        &backends[0]
    }

    fn draw(&self, bound: u64) -> u64 {
        match &self.random {
            RandomSource::Thread => rand::rng().random_range(0..bound),
            RandomSource::Seeded(rng) => {
                let mut rng = rng.lock().expect("selector rng lock poisoned");
                rng.random_range(0..bound)
            }
        }
    }
}
