//! Settings file loading and validation.

use std::fs;
use std::path::Path;

use crate::errors::{RouterError, RouterResult};

use super::types::RouterConfig;

/// Load and parse a TOML settings file.
///
/// # Arguments
/// * `path` - Path to the TOML settings file
///
/// # Returns
/// * `RouterResult<RouterConfig>` - Parsed and validated configuration
///
/// # Example
/// ```no_run
/// use relayllm::config::load_settings;
///
/// let config = load_settings("relayllm.toml").unwrap();
/// ```
pub fn load_settings<P: AsRef<Path>>(path: P) -> RouterResult<RouterConfig> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        RouterError::Config(format!(
            "Failed to read settings file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_settings(&content)
}

/// Parse a TOML settings string.
pub fn parse_settings(content: &str) -> RouterResult<RouterConfig> {
    let config: RouterConfig = toml::from_str(content)
        .map_err(|e| RouterError::Config(format!("Failed to parse TOML: {}", e)))?;

    validate_settings(&config)?;

    Ok(config)
}

/// Validate the settings for consistency.
fn validate_settings(config: &RouterConfig) -> RouterResult<()> {
    // Strategy name must parse; FromStr carries the hint message.
    config.settings.routing_strategy()?;

    if config.settings.pool_factor == 0 {
        return Err(RouterError::Config(
            "pool_factor must be at least 1\n  → Remove the setting to use the default"
                .to_string(),
        ));
    }

    if config.settings.attempt_timeout_ms == Some(0) {
        return Err(RouterError::Config(
            "attempt_timeout_ms must be greater than 0\n  → Remove the setting to disable the deadline"
                .to_string(),
        ));
    }

    Ok(())
}
