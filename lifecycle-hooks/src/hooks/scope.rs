//! Call scope passed through every hook invocation.
//!
//! A [`CallScope`] carries a cancellation signal, an optional deadline and the
//! optional identity of the acting principal. The registry forwards it to
//! each hook untouched; it never cancels or times out a hook on its own.

use super::traits::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Identity of the principal performing a persistence operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Actor {
    fn from(id: &str) -> Self {
        Actor::new(id)
    }
}

impl From<String> for Actor {
    fn from(id: String) -> Self {
        Actor(id)
    }
}

/// Cancellation, deadline and actor carrier for one persistence call.
///
/// Cloning is cheap and clones share the same cancellation token.
#[derive(Debug, Clone, Default)]
pub struct CallScope {
    token: CancellationToken,
    deadline: Option<Instant>,
    actor: Option<Actor>,
}

impl CallScope {
    /// Create a scope with no actor, no deadline and a fresh cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the acting principal
    pub fn with_actor(mut self, actor: impl Into<Actor>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Use an existing cancellation token, e.g. one owned by a request handler
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Derive a scope whose token is cancelled with this one but can also be
    /// cancelled on its own. Actor and deadline are inherited.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
            actor: self.actor.clone(),
        }
    }

    /// Acting principal, if the caller supplied one
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token observed by well-behaved async hooks
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel this scope and every child derived from it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail with [`HookError::Canceled`] or [`HookError::DeadlineExceeded`]
    /// if the scope is already done.
    pub fn check(&self) -> Result<(), HookError> {
        if self.is_cancelled() {
            return Err(HookError::Canceled);
        }
        if self.is_expired() {
            return Err(HookError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_scope_is_live() {
        let scope = CallScope::new();
        assert!(scope.check().is_ok());
        assert!(scope.actor().is_none());
        assert!(scope.deadline().is_none());
    }

    #[test]
    fn test_cancel_propagates_to_child_only_downward() {
        let parent = CallScope::new().with_actor("alice");
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();
        assert!(matches!(child.check(), Err(HookError::Canceled)));
        assert!(parent.check().is_ok());

        parent.cancel();
        assert!(matches!(sibling.check(), Err(HookError::Canceled)));
        assert_eq!(sibling.actor().map(Actor::as_str), Some("alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expiry() {
        let scope = CallScope::new().with_timeout(Duration::from_millis(50));
        assert!(scope.check().is_ok());

        tokio::time::advance(Duration::from_millis(51)).await;

        assert!(matches!(scope.check(), Err(HookError::DeadlineExceeded)));
    }

    #[test]
    fn test_cancellation_wins_over_deadline() {
        let scope = CallScope::new().with_deadline(Instant::now());
        scope.cancel();
        assert!(matches!(scope.check(), Err(HookError::Canceled)));
    }
}
