#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod info;
pub mod polymorphic;
pub mod registry;
pub mod serde;
pub mod strategy;
pub mod table;
pub mod value;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::MappingError;
pub use registry::{Mappable, MappingRegistry};
pub use crate::serde::{Serializable, SerializableExt};
