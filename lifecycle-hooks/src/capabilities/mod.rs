//! Behavioral capabilities and the built-in hooks that use them.
//!
//! A capability is a small trait an entity type implements to opt into a
//! family of ready-made hooks. Each capability is expressed as a pair of
//! conversions between the entity and a plain *view* struct:
//!
//! - `into view`: read the capability state out of the entity
//! - `from view`: write the (possibly mutated) state back into the entity
//!
//! Built-in hooks read the view, mutate it through the view's own methods and
//! write it back, so they work on any entity type that satisfies the bound.
//! The bound is checked at compile time; there is no runtime cast that could
//! fail.
//!
//! - [`soft_delete`]: `SoftDeletable`, `SoftDeleteHook`, `RestoreHook`, `is_soft_deleted`
//! - [`audit`]: `Auditable`, `AuditHook`, `CreateAuditHook`

pub mod audit;
pub mod soft_delete;

pub use audit::{AuditHook, AuditStamp, Auditable, CreateAuditHook};
pub use soft_delete::{DeletionMarker, RestoreHook, SoftDeletable, SoftDeleteHook, is_soft_deleted};

/// Implement [`SoftDeletable`] for a struct with an
/// `Option<chrono::DateTime<chrono::Utc>>` field.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use lifecycle_hooks::impl_soft_deletable;
///
/// struct Post {
///     deleted_at: Option<DateTime<Utc>>,
/// }
///
/// impl_soft_deletable!(Post, deleted_at);
/// ```
#[macro_export]
macro_rules! impl_soft_deletable {
    ($ty:ty, $field:ident) => {
        impl $crate::capabilities::SoftDeletable for $ty {
            fn deletion_marker(&self) -> $crate::capabilities::DeletionMarker {
                $crate::capabilities::DeletionMarker::from(self.$field)
            }

            fn set_deletion_marker(&mut self, marker: $crate::capabilities::DeletionMarker) {
                self.$field = marker.deleted_at();
            }
        }
    };
}

/// Implement [`Auditable`] for a struct with `Option<DateTime<Utc>>`
/// timestamp fields and `Option<String>` actor fields.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use lifecycle_hooks::impl_auditable;
///
/// struct Post {
///     created_at: Option<DateTime<Utc>>,
///     updated_at: Option<DateTime<Utc>>,
///     created_by: Option<String>,
///     updated_by: Option<String>,
/// }
///
/// impl_auditable!(Post {
///     created_at,
///     updated_at,
///     created_by,
///     updated_by
/// });
/// ```
#[macro_export]
macro_rules! impl_auditable {
    ($ty:ty { $created_at:ident, $updated_at:ident, $created_by:ident, $updated_by:ident $(,)? }) => {
        impl $crate::capabilities::Auditable for $ty {
            fn audit_stamp(&self) -> $crate::capabilities::AuditStamp {
                $crate::capabilities::AuditStamp {
                    created_at: self.$created_at,
                    updated_at: self.$updated_at,
                    created_by: self.$created_by.clone(),
                    updated_by: self.$updated_by.clone(),
                }
            }

            fn set_audit_stamp(&mut self, stamp: $crate::capabilities::AuditStamp) {
                self.$created_at = stamp.created_at;
                self.$updated_at = stamp.updated_at;
                self.$created_by = stamp.created_by;
                self.$updated_by = stamp.updated_by;
            }
        }
    };
}
