//! Entity lifecycle hooks.
//!
//! This module provides the hook engine that sequences user-supplied callbacks
//! around persistence operations. Hooks allow applications to:
//! - Stamp or normalise entity fields before they are written
//! - Reject a create, update or delete before it reaches storage
//! - React to a completed write
//!
//! # Architecture
//!
//! - `traits.rs`: [`EntityHook`] trait, [`Phase`] and [`HookError`]
//! - `registry.rs`: [`HookRegistry`], one per entity type
//! - `scope.rs`: [`CallScope`] carrying cancellation, deadline and actor
//!
//! Ready-made hooks for soft deletion and audit stamping live in
//! [`crate::capabilities`].

pub mod registry;
pub mod scope;
pub mod traits;

pub use registry::HookRegistry;
pub use scope::{Actor, CallScope};
pub use traits::{EntityHook, FnHook, HookError, Phase, hook_fn};
