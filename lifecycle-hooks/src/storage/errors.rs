//! Error types for the repository seam

use std::error::Error;
use std::fmt;

/// Error reported by a [`Repository`](super::Repository) implementation
#[derive(Debug)]
pub enum StorageError {
    /// Data not found
    NotFound(String),

    /// Item already exists (duplicate key)
    AlreadyExists(String),

    /// The backend rejected the entity
    Validation(String),

    /// Backend-specific error
    Backend(String),

    /// Other error
    Other(String),
}

/// Result type returned by [`Repository`](super::Repository) methods
pub type StorageResult<T> = Result<T, StorageError>;

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            StorageError::Validation(msg) => write!(f, "Validation error: {}", msg),
            StorageError::Backend(msg) => write!(f, "Backend error: {}", msg),
            StorageError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl Error for StorageError {}
