use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Engine path is not empty
/// - Timeouts, when set, are not 0
/// - Workspace prefix is a plain, non-empty name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine.path cannot be empty".to_string(),
        ));
    }

    if config.engine.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "engine.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.fetch.timeout_secs == Some(0) || config.fetch.connect_timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "fetch timeouts cannot be 0".to_string(),
        ));
    }

    let prefix = &config.workspace.prefix;
    if prefix.is_empty() || prefix.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "workspace.prefix must be a non-empty name without separators, got {:?}",
            prefix
        )));
    }

    Ok(())
}
