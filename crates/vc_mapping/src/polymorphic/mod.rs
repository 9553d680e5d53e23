//! Polymorphic resolution: choosing the concrete subclass to deserialize into.
//!
//! Two mechanisms are registered per base class and tried in order:
//!
//! 1. A [`Resolver`] function inspecting the raw input.
//! 2. The discriminant switch table: [`SwitchCase`]s registered by each
//!    subclass against its immediate parent, scanned in registration order.
//!
//! When a switch case selects a subclass that is itself a base with resolvers
//! or cases, resolution continues from there and the most specific match wins.
//! The chosen blank instance is then populated by ordinary deserialization.

// -----------------------------------------------------------------------------
// Modules

mod resolve;
mod switch;

// -----------------------------------------------------------------------------
// Exports

pub use resolve::Resolver;
pub use switch::{Initializer, SwitchCase};
