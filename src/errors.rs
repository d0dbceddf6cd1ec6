use std::error::Error;
use std::fmt;

/// Failure of a single backend generation attempt
///
/// This is the error type backend clients surface through
/// [`TextGenerator::generate`](crate::TextGenerator::generate). The router
/// recovers from these locally by failing over to another backend; they only
/// reach the caller wrapped inside [`RouterError::FailoverExhausted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection-level failure (DNS, refused, reset)
    Transport(String),
    /// Error response from the provider
    Api(String),
    /// The attempt did not complete within its deadline
    Timeout(String),
    /// The attempt could not be executed at all
    Unavailable(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(msg) => write!(f, "Transport error: {}", msg),
            BackendError::Api(msg) => write!(f, "API error: {}", msg),
            BackendError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            BackendError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
        }
    }
}

impl Error for BackendError {}

/// One failed backend call, recorded during an invocation
///
/// Attempts are kept in the order they were made: the originally selected
/// backend first, then each failover candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub backend_id: usize,
    pub backend_name: String,
    pub error: BackendError,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (id {}): {}", self.backend_name, self.backend_id, self.error)
    }
}

/// Custom error types for router operations
#[derive(Debug)]
pub enum RouterError {
    /// Invalid router configuration (empty backend list, zero weight, bad settings)
    Config(String),
    /// Every configured backend failed for this invocation
    FailoverExhausted(Vec<FailedAttempt>),
    /// An entry point was called after `shutdown()`
    Shutdown,
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RouterError::FailoverExhausted(attempts) => {
                write!(f, "All {} backend(s) failed: ", attempts.len())?;
                for (i, attempt) in attempts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", attempt)?;
                }
                Ok(())
            }
            RouterError::Shutdown => write!(f, "Router has been shut down"),
        }
    }
}

impl Error for RouterError {}

/// Convert std::io::Error to RouterError
impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        RouterError::Config(err.to_string())
    }
}

/// Convert toml parsing errors to RouterError
impl From<toml::de::Error> for RouterError {
    fn from(err: toml::de::Error) -> Self {
        RouterError::Config(err.to_string())
    }
}

/// Result type alias for router operations
pub type RouterResult<T> = Result<T, RouterError>;

impl RouterError {
    /// The ordered attempt list, if this is a failover exhaustion error
    pub fn attempts(&self) -> Option<&[FailedAttempt]> {
        match self {
            RouterError::FailoverExhausted(attempts) => Some(attempts),
            _ => None,
        }
    }
}
