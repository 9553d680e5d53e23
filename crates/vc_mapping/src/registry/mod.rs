//! The class-to-table registry and explicit class registration.
//!
//! ## Menu
//!
//! - [`MappingRegistry`]: the context object owning every mapping table, the
//!   class hierarchy links and the polymorphic registries.
//! - [`Mappable`]: implemented by a type to declare its parent and fields.
//! - [`ParentClass`]: the explicit link from a class to its immediate parent.
//! - [`ClassDeclaration`]: the registration surface handed to [`Mappable::declare`].
//! - [`MappingRegistryArc`]: a shared handle for multi-threaded use.
//!
//! ## Lifecycle
//!
//! Registration happens first and mutates the registry; serving reads it.
//! Once a table is referenced by a subclass table it is sealed, and any
//! further field registration on it fails with [`SealedTable`].
//!
//! [`SealedTable`]: crate::MappingError::SealedTable

// -----------------------------------------------------------------------------
// Modules

mod mappable;
mod mapping_registry;
mod registry_arc;

// -----------------------------------------------------------------------------
// Exports

pub use mappable::{ClassDeclaration, Mappable, ParentClass};
pub use mapping_registry::MappingRegistry;
pub use registry_arc::MappingRegistryArc;
