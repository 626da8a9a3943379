//! Audit stamping capability.
//!
//! Register [`CreateAuditHook`] as a before-create hook and [`AuditHook`] as a
//! before-save hook. On create both run (create first, then save), so the
//! creation provenance is set once and the update fields are refreshed on
//! every write. `CreateAuditHook` must not be registered for update phases,
//! otherwise it overwrites the creation provenance.

use crate::config::AuditConfig;
use crate::hooks::{Actor, CallScope, EntityHook, HookError, HookRegistry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Audit view: who created and last updated an entity, and when
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl AuditStamp {
    pub fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }

    pub fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    pub fn set_created_by(&mut self, actor: &Actor) {
        self.created_by = Some(actor.as_str().to_string());
    }

    pub fn set_updated_by(&mut self, actor: &Actor) {
        self.updated_by = Some(actor.as_str().to_string());
    }
}

/// Entities that record creation and update provenance.
pub trait Auditable {
    /// Read the current audit fields
    fn audit_stamp(&self) -> AuditStamp;

    /// Replace the audit fields
    fn set_audit_stamp(&mut self, stamp: AuditStamp);

    /// Read the stamp, apply `mutate` to it and write it back
    fn update_audit_stamp<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut AuditStamp),
        Self: Sized,
    {
        let mut stamp = self.audit_stamp();
        mutate(&mut stamp);
        self.set_audit_stamp(stamp);
    }
}

/// Which actor, if any, an audit hook writes for this call
fn stamping_actor<'a>(
    scope: &'a CallScope,
    stamp_actor: bool,
    require_actor: bool,
) -> Result<Option<&'a Actor>, HookError> {
    match scope.actor() {
        None if require_actor => Err(HookError::MissingActor),
        actor => Ok(actor.filter(|_| stamp_actor)),
    }
}

/// Stamps `updated_at`, and `updated_by` when the scope carries an actor.
///
/// Without an actor `updated_by` keeps its previous value, unless the hook
/// was built with [`requiring_actor`](Self::requiring_actor), in which case
/// the call fails with [`HookError::MissingActor`].
#[derive(Debug, Clone, Copy)]
pub struct AuditHook {
    stamp_actor: bool,
    require_actor: bool,
}

impl AuditHook {
    pub fn new() -> Self {
        Self::from_config(&AuditConfig::default())
    }

    /// Only stamp timestamps, never the actor fields
    pub fn timestamps_only() -> Self {
        Self {
            stamp_actor: false,
            require_actor: false,
        }
    }

    /// Fail instead of stamping when the scope has no actor
    pub fn requiring_actor() -> Self {
        Self {
            stamp_actor: true,
            require_actor: true,
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            stamp_actor: config.stamp_actor,
            require_actor: config.require_actor,
        }
    }
}

impl Default for AuditHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> EntityHook<T> for AuditHook
where
    T: Auditable + Send,
{
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError> {
        scope.check()?;
        let actor = stamping_actor(scope, self.stamp_actor, self.require_actor)?;
        let now = Utc::now();

        entity.update_audit_stamp(|stamp| {
            stamp.set_updated_at(now);
            if let Some(actor) = actor {
                stamp.set_updated_by(actor);
            }
        });

        trace!(updated_at = %now, actor = ?actor, "Audit stamp refreshed");
        Ok(())
    }

    fn name(&self) -> &str {
        "audit"
    }
}

/// Stamps creation and update fields with the same instant and actor.
#[derive(Debug, Clone, Copy)]
pub struct CreateAuditHook {
    stamp_actor: bool,
    require_actor: bool,
}

impl CreateAuditHook {
    pub fn new() -> Self {
        Self::from_config(&AuditConfig::default())
    }

    /// Only stamp timestamps, never the actor fields
    pub fn timestamps_only() -> Self {
        Self {
            stamp_actor: false,
            require_actor: false,
        }
    }

    /// Fail instead of stamping when the scope has no actor
    pub fn requiring_actor() -> Self {
        Self {
            stamp_actor: true,
            require_actor: true,
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            stamp_actor: config.stamp_actor,
            require_actor: config.require_actor,
        }
    }
}

impl Default for CreateAuditHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> EntityHook<T> for CreateAuditHook
where
    T: Auditable + Send,
{
    async fn call(&self, scope: &CallScope, entity: &mut T) -> Result<(), HookError> {
        scope.check()?;
        let actor = stamping_actor(scope, self.stamp_actor, self.require_actor)?;
        let now = Utc::now();

        entity.update_audit_stamp(|stamp| {
            stamp.set_created_at(now);
            stamp.set_updated_at(now);
            if let Some(actor) = actor {
                stamp.set_created_by(actor);
                stamp.set_updated_by(actor);
            }
        });

        trace!(created_at = %now, actor = ?actor, "Creation audit stamp set");
        Ok(())
    }

    fn name(&self) -> &str {
        "create_audit"
    }
}

impl<T> HookRegistry<T>
where
    T: Auditable + Send + 'static,
{
    /// Register [`CreateAuditHook`] before create and [`AuditHook`] before save
    pub fn with_audit(&mut self) -> &mut Self {
        self.install_audit(&AuditConfig::default())
    }

    /// Register the audit hooks if `config` enables them
    pub fn install_audit(&mut self, config: &AuditConfig) -> &mut Self {
        if !config.enabled {
            return self;
        }
        self.register_before_create(CreateAuditHook::from_config(config))
            .register_before_save(AuditHook::from_config(config))
    }
}
