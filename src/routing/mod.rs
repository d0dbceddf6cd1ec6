pub mod selector;
pub mod stats;

mod builder;
mod dispatcher;
mod pool;
mod router;

pub use builder::RouterBuilder;
pub use pool::RouterState;
pub use router::{InvocationHandle, LlmRouter};
pub use selector::{RoutingStrategy, Selector};
pub use stats::BackendStats;
