//! Persistence seam.
//!
//! The crate does not store anything itself. [`Repository`] describes the
//! physical operations a backend provides, and [`HookedRepository`] wraps one
//! with a [`HookRegistry`](crate::hooks::HookRegistry) so every write is
//! bracketed by its before and after phases.

pub mod errors;
pub mod hooked;
pub mod traits;

pub use errors::{StorageError, StorageResult};
pub use hooked::{HookedRepository, Operation};
pub use traits::{Identified, Repository};
