//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Configuration for the built-in hooks and the logging layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HooksConfig {
    pub soft_delete: SoftDeleteConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

/// Configuration for the built-in soft-delete hook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SoftDeleteConfig {
    /// Whether `install_soft_delete` registers the before-delete hook
    pub enabled: bool,
}

impl Default for SoftDeleteConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration for the built-in audit hooks.
///
/// When `stamp_actor` is false the audit hooks only touch the timestamp
/// fields, even if the call scope carries an actor. `require_actor` turns a
/// missing actor into a hook failure and only makes sense while actors are
/// being stamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether `install_audit` registers the create-audit and audit hooks
    pub enabled: bool,

    /// Whether the acting principal is written to `created_by`/`updated_by`
    pub stamp_actor: bool,

    /// Whether a write without an actor in scope is rejected
    pub require_actor: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stamp_actor: true,
            require_actor: false,
        }
    }
}

/// Where and how the optional global subscriber writes.
///
/// `file` and `stdout` combine: both set means every event goes to both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Full,
            file: None,
            stdout: true,
        }
    }
}

/// Minimum level of the global subscriber, unless `RUST_LOG` overrides it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Level::from(*self).as_str().to_lowercase().fmt(f)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Level>()
            .map(LogLevel::from)
            .map_err(|_| format!("Invalid log level: {s}"))
    }
}

/// Output layout of the `tracing-subscriber` formatter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
    Json,
}
