//! Trait definitions for the persistence layer the hooks run around

use async_trait::async_trait;
use std::fmt::Debug;

use crate::storage::errors::StorageResult;

/// Entities with a stable identity
pub trait Identified {
    type Id: Clone + Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Persistence operations for one entity type.
///
/// Implementations perform the physical work only. Hook sequencing is added
/// by wrapping a repository in [`HookedRepository`](super::HookedRepository).
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Identified + Send + Sync,
{
    /// Persist a new entity
    async fn insert(&self, entity: &T) -> StorageResult<()>;

    /// Persist changes to an existing entity
    async fn update(&self, entity: &T) -> StorageResult<()>;

    /// Delete an entity.
    ///
    /// Receives the entity as left by the before-delete hooks. A repository
    /// that supports soft deletion should store the deletion marker instead of
    /// removing the row when the entity is marked.
    async fn delete(&self, entity: &T) -> StorageResult<()>;

    /// Get an entity by its ID
    async fn find_by_id(&self, id: &T::Id) -> StorageResult<Option<T>>;

    /// List every stored entity
    async fn find_all(&self) -> StorageResult<Vec<T>>;

    /// Count stored entities
    async fn count(&self) -> StorageResult<usize>;
}
