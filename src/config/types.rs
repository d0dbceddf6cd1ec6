//! Configuration types for TOML-based router settings.
//!
//! These types map directly to the TOML settings file structure. Backend
//! generation capabilities are opaque values constructed in code, so the
//! file carries router tunables only.

use serde::Deserialize;

use crate::constants;
use crate::errors::RouterResult;
use crate::routing::RoutingStrategy;

/// Root configuration structure.
#[derive(Debug, Deserialize, Default)]
pub struct RouterConfig {
    /// Global settings for the router.
    #[serde(default)]
    pub settings: Settings,
}

/// Global settings for the router.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Routing strategy: "round_robin", "weighted", or "failover".
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Worker pool size as a multiple of the backend count.
    #[serde(default = "default_pool_factor")]
    pub pool_factor: usize,

    /// Optional per-attempt deadline in milliseconds.
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            pool_factor: default_pool_factor(),
            attempt_timeout_ms: None,
        }
    }
}

impl Settings {
    /// Parse the configured strategy name.
    pub fn routing_strategy(&self) -> RouterResult<RoutingStrategy> {
        self.strategy.parse()
    }
}

fn default_strategy() -> String {
    constants::DEFAULT_STRATEGY.to_string()
}

fn default_pool_factor() -> usize {
    constants::DEFAULT_POOL_FACTOR
}
