//! Traits and core types for entity lifecycle hooks.
//!
//! A hook is a unit of work that receives the current [`CallScope`] and a
//! mutable reference to the entity being persisted. It either mutates the
//! entity and returns `Ok(())`, or fails and halts the phase it runs in.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use lifecycle_hooks::hooks::{CallScope, EntityHook, HookError};
//!
//! #[derive(Debug, Default)]
//! struct Article {
//!     slug: String,
//!     title: String,
//! }
//!
//! #[derive(Debug)]
//! struct SlugHook;
//!
//! #[async_trait]
//! impl EntityHook<Article> for SlugHook {
//!     async fn call(&self, scope: &CallScope, article: &mut Article) -> Result<(), HookError> {
//!         scope.check()?;
//!         article.slug = article.title.to_lowercase().replace(' ', "-");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "slug"
//!     }
//! }
//! ```

use super::scope::CallScope;
use async_trait::async_trait;
use std::fmt;

/// The eight points in the create/update/delete/save lifecycle where hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
    /// Runs after `BeforeCreate` and after `BeforeUpdate`
    BeforeSave,
    /// Runs after `AfterCreate` and after `AfterUpdate`
    AfterSave,
}

impl Phase {
    /// All phases in declaration order
    pub const ALL: [Phase; 8] = [
        Phase::BeforeCreate,
        Phase::AfterCreate,
        Phase::BeforeUpdate,
        Phase::AfterUpdate,
        Phase::BeforeDelete,
        Phase::AfterDelete,
        Phase::BeforeSave,
        Phase::AfterSave,
    ];

    /// Stable snake_case name, used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeCreate => "before_create",
            Phase::AfterCreate => "after_create",
            Phase::BeforeUpdate => "before_update",
            Phase::AfterUpdate => "after_update",
            Phase::BeforeDelete => "before_delete",
            Phase::AfterDelete => "after_delete",
            Phase::BeforeSave => "before_save",
            Phase::AfterSave => "after_save",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Phase::BeforeCreate => 0,
            Phase::AfterCreate => 1,
            Phase::BeforeUpdate => 2,
            Phase::AfterUpdate => 3,
            Phase::BeforeDelete => 4,
            Phase::AfterDelete => 5,
            Phase::BeforeSave => 6,
            Phase::AfterSave => 7,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a failing hook.
///
/// The registry never wraps or rewrites these; whatever a hook returns is
/// what the caller of an `execute_*` operation receives.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The call scope was cancelled before or during the hook
    #[error("operation cancelled")]
    Canceled,

    /// The call scope deadline passed before or during the hook
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The hook needs an acting principal and the scope carries none
    #[error("an actor is required for this operation")]
    MissingActor,

    /// The hook rejected the entity or could not complete
    #[error("{0}")]
    Failed(String),

    /// Error raised by hook code written against `anyhow`
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    /// Shorthand for `HookError::Failed`
    pub fn failed(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }

    /// Whether this error came from the call scope rather than the hook body
    pub fn is_cancellation(&self) -> bool {
        matches!(self, HookError::Canceled | HookError::DeadlineExceeded)
    }
}

/// A hook invoked around persistence of entities of type `T`.
///
/// Hooks are stateless with respect to the registry. They may close over
/// external state supplied when they were built.
#[async_trait]
pub trait EntityHook<T>: Send + Sync {
    /// Run the hook against `entity`.
    ///
    /// Mutations made before returning `Ok(())` are seen by every later hook
    /// in the same invocation and by the caller.
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError>;

    /// Descriptive name used in logs and [`HookRegistry::list_hooks`](super::HookRegistry::list_hooks)
    fn name(&self) -> &str {
        "anonymous_hook"
    }
}

/// Hook backed by a synchronous closure.
///
/// Built with [`hook_fn`].
pub struct FnHook<F> {
    name: String,
    func: F,
}

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<T, F> EntityHook<T> for FnHook<F>
where
    T: Send,
    F: Fn(&CallScope, &mut T) -> Result<(), HookError> + Send + Sync,
{
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError> {
        (self.func)(scope, entity)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a synchronous closure as a named hook.
///
/// ```
/// use lifecycle_hooks::hooks::{hook_fn, HookError};
///
/// let trim = hook_fn("trim_name", |_scope, name: &mut String| {
///     *name = name.trim().to_string();
///     Ok::<(), HookError>(())
/// });
/// # let _ = trim;
/// ```
pub fn hook_fn<T, F>(name: impl Into<String>, func: F) -> FnHook<F>
where
    F: Fn(&CallScope, &mut T) -> Result<(), HookError> + Send + Sync,
{
    FnHook {
        name: name.into(),
        func,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_error_displays_bare_message() {
        assert_eq!(HookError::failed("boom").to_string(), "boom");
        assert!(!HookError::failed("boom").is_cancellation());
        assert!(HookError::Canceled.is_cancellation());
        assert!(HookError::DeadlineExceeded.is_cancellation());
    }

    #[test]
    fn test_phase_indices_are_unique() {
        let mut seen = [false; 8];
        for phase in Phase::ALL {
            assert!(!seen[phase.index()], "duplicate index for {}", phase);
            seen[phase.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[tokio::test]
    async fn test_fn_hook_runs_closure() {
        let hook = hook_fn("double", |_scope: &CallScope, value: &mut i32| {
            *value *= 2;
            Ok(())
        });
        let mut value = 21;

        hook.call(&CallScope::new(), &mut value).await.unwrap();

        assert_eq!(value, 42);
        assert_eq!(EntityHook::<i32>::name(&hook), "double");
    }
}
