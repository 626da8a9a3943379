//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::Path;

/// Builder for creating HooksConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: HooksConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: HooksConfig::default(),
        }
    }

    /// Enable or disable the built-in soft-delete hook.
    pub fn with_soft_delete(mut self, enabled: bool) -> Self {
        self.config.soft_delete.enabled = enabled;
        self
    }

    /// Enable or disable the built-in audit hooks.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.config.audit.enabled = enabled;
        self
    }

    /// Control whether audit hooks write the acting principal.
    pub fn with_actor_stamping(mut self, enabled: bool) -> Self {
        self.config.audit.stamp_actor = enabled;
        self
    }

    /// Reject audited writes whose scope carries no actor.
    pub fn with_required_actor(mut self, required: bool) -> Self {
        self.config.audit.require_actor = required;
        self
    }

    /// Configure logging level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Configure log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file only.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self.config.logging.stdout = false;
        self
    }

    /// Log to stdout as well as any configured file.
    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.config.logging.stdout = enabled;
        self
    }

    /// Create a development configuration
    ///
    /// - All built-in hooks enabled
    /// - Debug-level pretty logging
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// Create a testing configuration
    ///
    /// - All built-in hooks enabled
    /// - Only warnings and errors logged
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_log_format(LogFormat::Compact)
    }

    /// Create a production configuration
    ///
    /// - All built-in hooks enabled
    /// - JSON logging at Info level
    pub fn production() -> Self {
        Self::new()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Build the configuration.
    pub fn build(self) -> Result<HooksConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
