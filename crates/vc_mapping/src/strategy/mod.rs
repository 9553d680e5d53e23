//! Transform strategies: pure `value -> value` conversions applied to one field.
//!
//! A hydration strategy turns an incoming JSON value into the field's value;
//! a dehydration strategy turns the field's value into outgoing JSON.
//! Both use the same [`Strategy`] type, and both compose with [`compose`]
//! (or the [`compose!`](crate::compose) macro) in left-to-right order.
//!
//! ## Menu
//!
//! - [`Strategy`]: a shared, thread-safe transform.
//! - [`Stage`]: one argument of [`compose`], either a strategy or a nested sequence.
//! - [`compose`]: flattens stages and applies them in declaration order.
//! - [`dates`]: regex-driven date strategies (requires the `dates` feature).

// -----------------------------------------------------------------------------
// Modules

mod compose;
mod strategy;

#[cfg(feature = "dates")]
pub mod dates;

// -----------------------------------------------------------------------------
// Exports

pub use compose::{Stage, compose};
pub use strategy::Strategy;
