//! The conversion-capability registry.
//!
//! ## Menu
//!
//! - [`TypeRecord`]: A type's registered conversion entries and rendering entry.
//! - [`GetTypeRecord`]: A trait providing a function to create a `TypeRecord` from a type.
//! - [`ConvertRegistry`]: A container for storing and querying `TypeRecord`s.
//! - [`ConvertRegistryArc`]: A shared, lock-guarded registry handle.
//! - [`TypeIdMap`]: A [`TypeId`](core::any::TypeId)-keyed map used throughout the crate.
//!
//! ## auto_register
//!
//! See [`ConvertRegistry::auto_register`].
//!
//! We use the [`inventory`] crate to implement static registration; if the
//! `auto_register` feature is disabled the method does nothing and returns
//! `false`.

// -----------------------------------------------------------------------------
// Modules

mod record;
mod registry;
mod typeid_map;

// -----------------------------------------------------------------------------
// Exports

pub use record::{GetTypeRecord, TypeRecord};
#[cfg(feature = "auto_register")]
pub use registry::Registration;
pub use registry::{ConvertRegistry, ConvertRegistryArc};
pub use typeid_map::{TypeIdHashState, TypeIdHasher, TypeIdMap};
