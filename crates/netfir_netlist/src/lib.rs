//! Gate-level netlist IR consumed by the FIRRTL backend.
//!
//! A [`Design`] is an ordered arena of [`Module`]s. Each module owns its
//! [`Wire`]s and [`Cell`]s in arenas and a list of direct [`Connection`]s.
//! Signals are bit-level [`SigSpec`]s mixing constants and wire bits. Every
//! type derives `serde` so a design can be loaded from JSON.

#![warn(missing_docs)]

pub mod arena;
pub mod cell;
pub mod const_value;
pub mod design;
pub mod error;
pub mod ids;
pub mod module;
pub mod sigspec;
pub mod wire;

pub use arena::{Arena, ArenaId};
pub use cell::{Cell, CellKind, PortConn};
pub use const_value::ConstValue;
pub use design::{Design, Selection};
pub use error::NetlistError;
pub use ids::{CellId, ModuleId, WireId};
pub use module::{Connection, Module};
pub use sigspec::{SigBit, SigChunk, SigSpec};
pub use wire::{PortDirection, Wire};
