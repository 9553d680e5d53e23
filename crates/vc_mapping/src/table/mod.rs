//! Per-class property mapping tables.
//!
//! ## Menu
//!
//! - [`PropertyEntry`]: one field's mapping (field id, external key, strategies).
//! - [`EntryBuilder`]: builds an entry, defaulting the external key to the field name.
//! - [`MappingTable`]: a class's own entries, chained to its nearest ancestor's table.
//!
//! ## Inheritance
//!
//! A table only stores the entries its own class declares. Lookups fall
//! through to the parent table unless the key was hidden by an ignore set,
//! and [`MappingTable::all_entries`] merges the whole chain. Parent tables
//! never know about their children, so sibling subclasses cannot affect each
//! other.

// -----------------------------------------------------------------------------
// Modules

mod entry;
mod mapping_table;

// -----------------------------------------------------------------------------
// Exports

pub use entry::{EntryBuilder, PropertyEntry};
pub use mapping_table::MappingTable;
