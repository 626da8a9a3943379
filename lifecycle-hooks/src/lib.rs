//! # lifecycle-hooks
//!
//! Per-entity-type lifecycle hooks that run around create, update and delete
//! operations, plus built-in soft-delete and audit hooks that work on any
//! entity implementing the matching capability trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use lifecycle_hooks::prelude::*;
//! use lifecycle_hooks::impl_auditable;
//!
//! #[derive(Debug, Default)]
//! struct Customer {
//!     name: String,
//!     created_at: Option<DateTime<Utc>>,
//!     updated_at: Option<DateTime<Utc>>,
//!     created_by: Option<String>,
//!     updated_by: Option<String>,
//! }
//!
//! impl_auditable!(Customer { created_at, updated_at, created_by, updated_by });
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut hooks = HookRegistry::<Customer>::new();
//!     hooks
//!         .with_audit()
//!         .register_before_save(hook_fn("trim_name", |_scope, customer: &mut Customer| {
//!             customer.name = customer.name.trim().to_string();
//!             Ok(())
//!         }));
//!
//!     let scope = CallScope::new().with_actor("alice");
//!     let mut customer = Customer { name: "  Ada ".into(), ..Default::default() };
//!     hooks.execute_before_create(&scope, &mut customer).await?;
//!
//!     assert_eq!(customer.name, "Ada");
//!     assert_eq!(customer.created_by.as_deref(), Some("alice"));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **hooks**: the engine: hook trait, phases, registry, call scope
//! - **capabilities**: `SoftDeletable` and `Auditable` plus their hooks
//! - **storage**: `Repository` seam and `HookedRepository` orchestration
//! - **config** / **logging**: layered configuration and tracing setup

pub mod capabilities;
pub mod config;
pub mod hooks;
pub mod logging;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::capabilities::{
        AuditHook, AuditStamp, Auditable, CreateAuditHook, DeletionMarker, RestoreHook,
        SoftDeletable, SoftDeleteHook, is_soft_deleted,
    };
    pub use crate::config::{ConfigBuilder, ConfigLoader, HooksConfig};
    pub use crate::hooks::{
        Actor, CallScope, EntityHook, HookError, HookRegistry, Phase, hook_fn,
    };
    pub use crate::storage::{HookedRepository, Identified, Repository, StorageError};
    pub use crate::{LifecycleError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A hook failed; the error is passed through unchanged
    #[error(transparent)]
    Hook(#[from] hooks::HookError),

    /// An after-phase hook failed. The physical operation had already
    /// succeeded, so the entity must be treated as persisted.
    #[error("{operation} succeeded but an after-hook failed: {source}")]
    AfterPhase {
        operation: storage::Operation,
        #[source]
        source: hooks::HookError,
    },

    /// Error from the wrapped repository
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),
}

impl LifecycleError {
    /// The hook error behind this failure, if a hook caused it
    pub fn hook_error(&self) -> Option<&hooks::HookError> {
        match self {
            LifecycleError::Hook(err) | LifecycleError::AfterPhase { source: err, .. } => {
                Some(err)
            }
            _ => None,
        }
    }

    /// Whether the physical operation completed despite this error
    pub fn is_persisted(&self) -> bool {
        matches!(self, LifecycleError::AfterPhase { .. })
    }
}

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Load configuration from the default files and environment, then
/// initialize logging from it.
///
/// Keep the returned guard alive for as long as file logging should run.
pub fn init() -> Result<(config::HooksConfig, logging::LoggingGuard)> {
    let config = config::ConfigLoader::new()
        .load_default_files()?
        .load_env()
        .extract()?;
    let guard = logging::init(&config.logging)?;
    Ok((config, guard))
}
