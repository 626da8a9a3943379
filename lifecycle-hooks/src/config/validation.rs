//! Configuration validation.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &HooksConfig) -> Result<(), ConfigError> {
    validate_audit_config(&config.audit)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

/// An actor can only be required if it is going to be recorded.
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    if config.require_actor && !config.stamp_actor {
        return Err(ConfigError::ValidationError(
            "audit.require_actor needs audit.stamp_actor".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if let Some(file) = &config.file
        && file.file_name().is_none()
    {
        return Err(ConfigError::ValidationError(format!(
            "Log file path must name a file: {:?}",
            file
        )));
    }

    Ok(())
}
