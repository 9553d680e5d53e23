//! The serializable capability: converting mapped instances to and from JSON.
//!
//! ## Serialization
//!
//! [`MappingRegistry::to_plain_object`] looks up the table of the instance's
//! concrete class and walks its merged entries:
//!
//! - a field that reads as `None` is skipped (never emitted as `null`);
//! - a nested [`Serializable`] is serialized through its own table, ignoring
//!   the entry's dehydration strategy;
//! - arrays are handled element by element with the same rule;
//! - anything else goes through the entry's dehydration strategy.
//!
//! [`MappingRegistry::serialize`] encodes the result as JSON text.
//!
//! ## Deserialization
//!
//! [`MappingRegistry::deserialize`] walks the keys of the input object,
//! drops keys with no entry, applies the entry's hydration strategy (per
//! element for arrays) and writes the result into the instance.
//!
//! [`MappingRegistry::to_plain_object`]: crate::MappingRegistry::to_plain_object
//! [`MappingRegistry::serialize`]: crate::MappingRegistry::serialize
//! [`MappingRegistry::deserialize`]: crate::MappingRegistry::deserialize

// -----------------------------------------------------------------------------
// Modules

mod de;
mod object;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use object::{Serializable, SerializableExt};
