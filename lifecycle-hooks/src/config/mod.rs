//! Configuration system.
//!
//! Configuration is layered with figment: built-in defaults, then an optional
//! file, then environment variables. The result is validated before use.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::{ConfigLoader, ConfigSource};
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "lifecycle-hooks.toml",
    "lifecycle-hooks.yaml",
    "lifecycle-hooks.yml",
    "lifecycle-hooks.json",
];

/// Environment variable prefix, e.g. `LIFECYCLE_HOOKS_AUDIT__STAMP_ACTOR=false`
pub const ENV_PREFIX: &str = "LIFECYCLE_HOOKS_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
