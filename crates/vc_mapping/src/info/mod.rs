//! Identity of mapped classes and of their fields.
//!
//! - [`ClassId`]: a stable token for a concrete Rust type.
//! - [`FieldId`]: the internal identifier of one field, either a name or a [`Symbol`].
//! - [`Symbol`]: a process-unique opaque identifier for fields without a natural name.

// -----------------------------------------------------------------------------
// Modules

mod class_id;
mod field_id;

// -----------------------------------------------------------------------------
// Exports

pub use class_id::ClassId;
pub use field_id::{FieldId, Symbol};
