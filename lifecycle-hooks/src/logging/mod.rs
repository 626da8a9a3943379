//! Structured logging setup.
//!
//! The hook engine itself only emits `tracing` events. This module installs a
//! global subscriber for applications that want the crate to do it: full,
//! pretty, compact or JSON output, to stdout, a non-blocking file writer, or
//! both. A `RUST_LOG` directive, when set, overrides the configured level.


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    SubscriberError(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Keeps the background writers alive.
///
/// Dropping it flushes and stops logging output, so hold it for the lifetime
/// of the application.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _writers: Vec<WorkerGuard>,
}

/// Initialize the logging system with the given configuration.
///
/// Calling this when a global subscriber is already installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggingGuard::default());
    }

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level.into()).into())
        .from_env_lossy();
    let (writer, guard) = build_writer(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Full => builder.try_init(),
    };

    match result {
        Ok(()) => Ok(guard),
        // lost a race with another initializer
        Err(_) if tracing::dispatcher::has_been_set() => {
            tracing::debug!("Global subscriber already installed; keeping it");
            Ok(LoggingGuard::default())
        }
        Err(e) => Err(LogError::SubscriberError(e.to_string())),
    }
}

/// Pick the output for `config`: the file, stdout, both, or nothing.
fn build_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, LoggingGuard)> {
    let stdout = config
        .stdout
        .then(|| tracing_appender::non_blocking(std::io::stdout()));
    let file = config
        .file
        .as_deref()
        .map(create_non_blocking_file)
        .transpose()?;

    Ok(match (file, stdout) {
        (Some((file, file_guard)), Some((stdout, stdout_guard))) => (
            BoxMakeWriter::new(file.and(stdout)),
            LoggingGuard {
                _writers: vec![file_guard, stdout_guard],
            },
        ),
        (Some((writer, guard)), None) | (None, Some((writer, guard))) => (
            BoxMakeWriter::new(writer),
            LoggingGuard {
                _writers: vec![guard],
            },
        ),
        (None, None) => (BoxMakeWriter::new(std::io::sink), LoggingGuard::default()),
    })
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| LogError::SubscriberError(format!("Not a file path: {}", path.display())))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level.parse().map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}
