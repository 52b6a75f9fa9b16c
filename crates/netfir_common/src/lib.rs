//! Shared foundational types used across the netfir workspace.
//!
//! This crate provides interned identifiers, 4-state logic values, and packed
//! logic vectors used by the netlist IR and the FIRRTL backend.

#![warn(missing_docs)]

pub mod ident;
pub mod logic;
pub mod logic_vec;

pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use logic_vec::LogicVec;
