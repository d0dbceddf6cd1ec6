//! Label helpers for consistent metric labeling

use crate::errors::BackendError;

/// Standard label keys
pub mod keys {
    /// Backend display name label key
    pub const BACKEND: &str = "backend";
    /// Attempt kind label key ("primary" or "failover")
    pub const ATTEMPT: &str = "attempt";
    /// Error type label key
    pub const ERROR_TYPE: &str = "error_type";
}

/// Convert BackendError to error type label string
pub fn error_type_label(error: &BackendError) -> &'static str {
    match error {
        BackendError::Transport(_) => "transport",
        BackendError::Api(_) => "api",
        BackendError::Timeout(_) => "timeout",
        BackendError::Unavailable(_) => "unavailable",
    }
}
