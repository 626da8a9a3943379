//! Soft-delete capability.
//!
//! Registering [`SoftDeleteHook`] as a before-delete hook turns a physical
//! delete into a logical one by stamping a deletion marker. Skipping the
//! physical delete is up to the repository, which can check
//! [`is_soft_deleted`].

use crate::config::SoftDeleteConfig;
use crate::hooks::{CallScope, EntityHook, HookError, HookRegistry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Deletion marker view: either unset or the instant of deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletionMarker(Option<DateTime<Utc>>);

impl DeletionMarker {
    /// An unset marker
    pub fn unset() -> Self {
        Self(None)
    }

    pub fn mark(&mut self, at: DateTime<Utc>) {
        self.0 = Some(at);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl From<Option<DateTime<Utc>>> for DeletionMarker {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Self(value)
    }
}

/// Entities that can be logically deleted.
///
/// Implementors provide the two view conversions; [`impl_soft_deletable!`](crate::impl_soft_deletable)
/// generates them for the common single-field case.
pub trait SoftDeletable {
    /// Read the current deletion marker
    fn deletion_marker(&self) -> DeletionMarker;

    /// Replace the deletion marker
    fn set_deletion_marker(&mut self, marker: DeletionMarker);

    fn is_deleted(&self) -> bool {
        self.deletion_marker().is_set()
    }

    /// Read the marker, apply `mutate` to it and write it back
    fn update_deletion_marker<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut DeletionMarker),
        Self: Sized,
    {
        let mut marker = self.deletion_marker();
        mutate(&mut marker);
        self.set_deletion_marker(marker);
    }
}

/// Whether `entity` carries a deletion marker. Pure; safe to call anywhere.
pub fn is_soft_deleted<T: SoftDeletable>(entity: &T) -> bool {
    entity.is_deleted()
}

/// Sets the deletion marker to the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftDeleteHook;

#[async_trait]
impl<T> EntityHook<T> for SoftDeleteHook
where
    T: SoftDeletable + Send,
{
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError> {
        scope.check()?;
        let now = Utc::now();
        entity.update_deletion_marker(|marker| marker.mark(now));
        trace!(deleted_at = %now, "Soft-delete marker set");
        Ok(())
    }

    fn name(&self) -> &str {
        "soft_delete"
    }
}

/// Clears the deletion marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreHook;

#[async_trait]
impl<T> EntityHook<T> for RestoreHook
where
    T: SoftDeletable + Send,
{
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError> {
        scope.check()?;
        entity.update_deletion_marker(DeletionMarker::clear);
        trace!("Soft-delete marker cleared");
        Ok(())
    }

    fn name(&self) -> &str {
        "restore"
    }
}

impl<T> HookRegistry<T>
where
    T: SoftDeletable + Send + 'static,
{
    /// Register [`SoftDeleteHook`] as a before-delete hook
    pub fn with_soft_delete(&mut self) -> &mut Self {
        self.register_before_delete(SoftDeleteHook)
    }

    /// Register the soft-delete hook if `config` enables it
    pub fn install_soft_delete(&mut self, config: &SoftDeleteConfig) -> &mut Self {
        if config.enabled {
            self.with_soft_delete();
        }
        self
    }
}
