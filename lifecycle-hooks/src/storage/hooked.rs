//! Repository wrapper that runs lifecycle hooks around each write.
//!
//! For every write the wrapper runs the matching before-phase, performs the
//! physical operation only if that phase succeeded, then runs the
//! after-phase. An after-phase failure is reported as
//! [`LifecycleError::AfterPhase`] because the write has already happened.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::traits::{Identified, Repository};
use crate::hooks::{CallScope, HookError, HookRegistry};
use crate::{LifecycleError, Result};

/// Write operation a hook phase ran around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// A [`Repository`] with a [`HookRegistry`] applied to its writes.
///
/// Entities are passed as `&mut T` so the caller keeps whatever the hooks
/// wrote, including after a failure; nothing is rolled back.
pub struct HookedRepository<T, R> {
    repository: R,
    hooks: Arc<HookRegistry<T>>,
}

impl<T, R> HookedRepository<T, R>
where
    T: Identified + Send + Sync,
    R: Repository<T>,
{
    pub fn new(repository: R, hooks: Arc<HookRegistry<T>>) -> Self {
        Self { repository, hooks }
    }

    /// The wrapped repository, for operations that bypass hooks
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn hooks(&self) -> &HookRegistry<T> {
        &self.hooks
    }

    /// Run create hooks around `Repository::insert`
    pub async fn create(&self, scope: &CallScope, entity: &mut T) -> Result<()> {
        self.hooks.execute_before_create(scope, entity).await?;
        self.repository.insert(entity).await?;
        debug!(id = ?entity.id(), "Entity created");

        let outcome = self.hooks.execute_after_create(scope, entity).await;
        after_phase(Operation::Create, outcome)
    }

    /// Run update hooks around `Repository::update`
    pub async fn update(&self, scope: &CallScope, entity: &mut T) -> Result<()> {
        self.hooks.execute_before_update(scope, entity).await?;
        self.repository.update(entity).await?;
        debug!(id = ?entity.id(), "Entity updated");

        let outcome = self.hooks.execute_after_update(scope, entity).await;
        after_phase(Operation::Update, outcome)
    }

    /// Run delete hooks around `Repository::delete`
    pub async fn delete(&self, scope: &CallScope, entity: &mut T) -> Result<()> {
        self.hooks.execute_before_delete(scope, entity).await?;
        self.repository.delete(entity).await?;
        debug!(id = ?entity.id(), "Entity deleted");

        let outcome = self.hooks.execute_after_delete(scope, entity).await;
        after_phase(Operation::Delete, outcome)
    }

    pub async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.repository.count().await?)
    }
}

fn after_phase(operation: Operation, outcome: std::result::Result<(), HookError>) -> Result<()> {
    outcome.map_err(|source| {
        warn!(%operation, error = %source, "After-hook failed; entity is already persisted");
        LifecycleError::AfterPhase { operation, source }
    })
}

impl<T, R: fmt::Debug> fmt::Debug for HookedRepository<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookedRepository")
            .field("repository", &self.repository)
            .field("hooks", &self.hooks)
            .finish()
    }
}
