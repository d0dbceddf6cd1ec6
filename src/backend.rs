use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::BackendError;

/// Common interface for all text-generation backends
///
/// This is the only contract the router depends on. Authentication, base
/// endpoint, model name and transport timeouts are entirely the
/// implementation's concern; a well-behaved implementation bounds its own
/// latency and surfaces failures as [`BackendError`].
#[async_trait]
pub trait TextGenerator {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// A named, weighted handle to a generation capability
///
/// Backends are immutable once constructed and shared read-only by all
/// concurrent invocations. The `id` is assigned by the router builder in
/// configuration order and is the stable identity used for failover
/// bookkeeping and logging — display names are not unique.
#[derive(Clone)]
pub struct Backend {
    id: usize,
    name: String,
    weight: u32,
    generator: Arc<dyn TextGenerator + Send + Sync>,
}

impl Backend {
    /// Create a new backend handle
    ///
    /// # Parameters
    /// * `id` - Unique identifier, assigned in configuration order
    /// * `name` - Display name for logging (not required to be unique)
    /// * `weight` - Relative weight for the weighted strategy
    /// * `generator` - The generation capability this handle wraps
    pub fn new(
        id: usize,
        name: impl Into<String>,
        weight: u32,
        generator: Arc<dyn TextGenerator + Send + Sync>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            generator,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Shared handle to the underlying generation capability
    pub(crate) fn generator(&self) -> Arc<dyn TextGenerator + Send + Sync> {
        Arc::clone(&self.generator)
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}
