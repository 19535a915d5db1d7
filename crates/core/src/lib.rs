//! Command gateway domain logic.
//!
//! Holds the immutable command registry and the bounded subprocess runner.
//! Nothing in this crate knows about HTTP; the `api` crate wires it into
//! request handlers.

pub mod registry;
pub mod runner;
