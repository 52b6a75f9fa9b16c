//! Cells: primitive operators, memories, flip-flops and sub-module instances.

use crate::const_value::ConstValue;
use crate::sigspec::SigSpec;
use crate::wire::lookup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! cell_kinds {
    ($($(#[$meta:meta])* $variant:ident => $tag:literal,)*) => {
        /// The type of a cell.
        ///
        /// Primitive cells carry a `$`-prefixed type tag. Any other tag names a
        /// user module; `$paramod` tags name a parameterized module variant.
        /// Serialized as the type tag string, e.g. `"$add"` or `"\\sub"`.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum CellKind {
            $($(#[$meta])* $variant,)*
            /// Instance of a user module, by type tag.
            Instance(String),
            /// Instance of a parameterized module variant, by full `$paramod` tag.
            Paramod(String),
            /// A `$`-prefixed type the backend does not know.
            Unknown(String),
        }

        impl CellKind {
            /// Returns the netlist type tag.
            pub fn tag(&self) -> &str {
                match self {
                    $(CellKind::$variant => $tag,)*
                    CellKind::Instance(tag) | CellKind::Paramod(tag) | CellKind::Unknown(tag) => tag,
                }
            }
        }

        impl From<&str> for CellKind {
            fn from(tag: &str) -> Self {
                match tag {
                    $($tag => CellKind::$variant,)*
                    _ if tag.starts_with("$paramod") => CellKind::Paramod(tag.to_string()),
                    _ if tag.starts_with('$') => CellKind::Unknown(tag.to_string()),
                    _ => CellKind::Instance(tag.to_string()),
                }
            }
        }
    };
}

cell_kinds! {
    /// Bitwise inversion.
    Not => "$not",
    /// Logical negation (`!a`).
    LogicNot => "$logic_not",
    /// Arithmetic negation.
    Neg => "$neg",
    /// AND reduction.
    ReduceAnd => "$reduce_and",
    /// OR reduction.
    ReduceOr => "$reduce_or",
    /// XOR reduction.
    ReduceXor => "$reduce_xor",
    /// XNOR reduction.
    ReduceXnor => "$reduce_xnor",
    /// Non-zero test.
    ReduceBool => "$reduce_bool",
    /// Addition.
    Add => "$add",
    /// Subtraction.
    Sub => "$sub",
    /// Multiplication.
    Mul => "$mul",
    /// Division.
    Div => "$div",
    /// Remainder.
    Mod => "$mod",
    /// Bitwise AND.
    And => "$and",
    /// Bitwise OR.
    Or => "$or",
    /// Bitwise XOR.
    Xor => "$xor",
    /// Equality.
    Eq => "$eq",
    /// Case equality.
    Eqx => "$eqx",
    /// Inequality.
    Ne => "$ne",
    /// Case inequality.
    Nex => "$nex",
    /// Less than.
    Lt => "$lt",
    /// Less than or equal.
    Le => "$le",
    /// Greater than.
    Gt => "$gt",
    /// Greater than or equal.
    Ge => "$ge",
    /// Logical left shift.
    Shl => "$shl",
    /// Arithmetic left shift.
    Sshl => "$sshl",
    /// Logical right shift.
    Shr => "$shr",
    /// Arithmetic right shift.
    Sshr => "$sshr",
    /// Logical AND.
    LogicAnd => "$logic_and",
    /// Logical OR.
    LogicOr => "$logic_or",
    /// Two-way multiplexer.
    Mux => "$mux",
    /// Multi-port memory.
    Mem => "$mem",
    /// Standalone memory read port.
    MemRd => "$memrd",
    /// Standalone memory write port.
    MemWr => "$memwr",
    /// Positive- or negative-edge D flip-flop.
    Dff => "$dff",
    /// Shift right with undefined fill (part select).
    Shiftx => "$shiftx",
    /// Bidirectional shift by a possibly negative amount.
    Shift => "$shift",
}

impl From<String> for CellKind {
    fn from(tag: String) -> Self {
        CellKind::from(tag.as_str())
    }
}

impl From<CellKind> for String {
    fn from(kind: CellKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A connection from a formal cell port to an actual signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortConn {
    /// Formal port name, e.g. `A` or `\din`.
    pub port: String,
    /// The connected signal.
    pub signal: SigSpec,
}

/// A cell instance within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The instance name.
    pub name: String,
    /// The cell type.
    #[serde(rename = "type")]
    pub kind: CellKind,
    /// Parameter values, e.g. `A_WIDTH` or `CLK_POLARITY`.
    #[serde(default)]
    pub params: BTreeMap<String, ConstValue>,
    /// Port connections in declaration order.
    #[serde(default)]
    pub connections: Vec<PortConn>,
}

impl Cell {
    /// Creates a cell with no parameters or connections.
    pub fn new(name: impl Into<String>, kind: impl Into<CellKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            params: BTreeMap::new(),
            connections: Vec::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with_param(mut self, name: impl Into<String>, value: ConstValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Builder-style port connection.
    pub fn with_port(mut self, port: impl Into<String>, signal: SigSpec) -> Self {
        self.connections.push(PortConn {
            port: port.into(),
            signal,
        });
        self
    }

    /// Looks up a parameter, accepting the name with or without a leading `\`.
    pub fn param(&self, name: &str) -> Option<&ConstValue> {
        lookup(&self.params, name)
    }

    /// Looks up the signal connected to a port, accepting the name with or
    /// without a leading `\`.
    pub fn port(&self, name: &str) -> Option<&SigSpec> {
        let bare = name.strip_prefix('\\').unwrap_or(name);
        self.connections
            .iter()
            .find(|c| c.port.strip_prefix('\\').unwrap_or(&c.port) == bare)
            .map(|c| &c.signal)
    }
}
