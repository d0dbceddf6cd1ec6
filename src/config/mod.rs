//! Configuration module for TOML-based router settings.
//!
//! Backend generation capabilities are opaque values built in code, so the
//! settings file only carries router tunables; apply them with
//! [`RouterBuilder::with_settings`](crate::RouterBuilder::with_settings).
//!
//! # Example Settings File
//!
//! ```toml
//! [settings]
//! strategy = "weighted"
//! pool_factor = 5
//! attempt_timeout_ms = 30000
//! ```

mod loader;
mod types;

pub use loader::{load_settings, parse_settings};
pub use types::{RouterConfig, Settings};
