//! Structural errors found when validating a loaded netlist.

use thiserror::Error;

/// A structural inconsistency in a [`Design`](crate::Design).
///
/// Designs built in memory are trusted; designs deserialized from a file are
/// checked with [`Design::validate`](crate::Design::validate) before lowering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetlistError {
    /// A wire was declared with zero width.
    #[error("wire `{wire}` in module `{module}` has zero width")]
    ZeroWidthWire {
        /// Owning module.
        module: String,
        /// Offending wire.
        wire: String,
    },
    /// A signal refers to a wire index that does not exist.
    #[error("{context} in module `{module}` refers to missing wire #{wire}")]
    DanglingWire {
        /// Owning module.
        module: String,
        /// The cell port or connection holding the reference.
        context: String,
        /// Raw wire index.
        wire: u32,
    },
    /// A signal refers to a bit beyond its wire's width.
    #[error("{context} in module `{module}` uses bit {offset} of `{wire}` which has width {width}")]
    BitOutOfRange {
        /// Owning module.
        module: String,
        /// The cell port or connection holding the reference.
        context: String,
        /// The wire's name.
        wire: String,
        /// Referenced bit.
        offset: u32,
        /// Declared width.
        width: u32,
    },
    /// The two sides of a direct connection differ in width.
    #[error("connection #{index} in module `{module}` joins {dst} bits to {src} bits")]
    WidthMismatch {
        /// Owning module.
        module: String,
        /// Index of the connection.
        index: usize,
        /// Destination width.
        dst: usize,
        /// Source width.
        src: usize,
    },
    /// The designated top module does not exist.
    #[error("top module #{0} does not exist")]
    DanglingTop(u32),
}
