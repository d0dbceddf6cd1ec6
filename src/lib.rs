//! RelayLLM is a Rust library that routes text-generation requests across a pool of
//! interchangeable LLM backends.
//!
//! It distributes calls according to a configurable strategy and transparently
//! retries on another backend when the selected one fails, behind a bounded
//! concurrency ceiling.
//!
//! # Features
//!
//! - **Routing strategies**: round-robin, weighted random, and primary/failover
//! - **Automatic failover**: remaining backends are tried in order within the
//!   same invocation when the selected one fails
//! - **Bounded concurrency**: primary attempts run on a worker pool sized
//!   relative to the backend count
//! - **Sync and async entry points**: await the result in place, or hold a
//!   handle and join it later
//! - **Attempt statistics**: per-backend request counts, error rates, and
//!   response times
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use relayllm::{LlmRouter, RoutingStrategy, TextGenerator, BackendError};
//! use async_trait::async_trait;
//!
//! struct MyClient; // wraps an actual provider SDK or HTTP client
//!
//! #[async_trait]
//! impl TextGenerator for MyClient {
//!     async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
//!         Ok(format!("echo: {prompt}"))
//!     }
//! }
//!
//! async fn example() {
//!     let router = LlmRouter::builder()
//!         .strategy(RoutingStrategy::RoundRobin)
//!         .add_backend("Qwen", 3, MyClient)
//!         .add_backend("DeepSeek", 2, MyClient)
//!         .build()
//!         .expect("Failed to build router");
//!
//!     let reply = router.invoke("Hello from the router!").await.unwrap();
//!     println!("{}", reply);
//!
//!     router.shutdown();
//! }
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod errors;
pub mod routing;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use backend::{Backend, TextGenerator};

pub use errors::{BackendError, FailedAttempt, RouterError, RouterResult};

pub use routing::{
    BackendStats, InvocationHandle, LlmRouter, RouterBuilder, RouterState, RoutingStrategy,
    Selector,
};

pub use config::{load_settings, parse_settings, RouterConfig, Settings};

#[cfg(feature = "metrics")]
pub use metrics::describe_metrics;

/// Initialize the logging system
///
/// This should be called at the start of your application in case
/// you want to activate the library's debug and info logging.
pub fn use_logging() {
    env_logger::init();
}
