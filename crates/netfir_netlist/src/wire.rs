//! Wires and module port directions.

use crate::const_value::ConstValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a module port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Driven from outside the module.
    Input,
    /// Driven from inside the module.
    Output,
    /// Bidirectional.
    InOut,
}

/// A named multi-bit wire inside a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    /// The netlist name, e.g. `\data` or `$add$top.v:3$1_Y`.
    pub name: String,
    /// Bit width (always positive).
    pub width: u32,
    /// Port direction, or `None` for an internal wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortDirection>,
    /// Attributes such as `init` or `keep`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, ConstValue>,
}

impl Wire {
    /// Creates an internal wire without attributes.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            port: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a port wire.
    pub fn port(name: impl Into<String>, width: u32, direction: PortDirection) -> Self {
        Self {
            port: Some(direction),
            ..Self::new(name, width)
        }
    }

    /// Returns `true` if this wire is a module port of any direction.
    pub fn is_port(&self) -> bool {
        self.port.is_some()
    }

    /// Returns `true` if this wire is an input port.
    pub fn is_input(&self) -> bool {
        self.port == Some(PortDirection::Input)
    }

    /// Looks up an attribute, accepting the name with or without a leading `\`.
    pub fn attribute(&self, name: &str) -> Option<&ConstValue> {
        lookup(&self.attributes, name)
    }
}

/// Finds `name` in a netlist key map where keys may carry a leading `\`.
pub(crate) fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    let bare = name.strip_prefix('\\').unwrap_or(name);
    map.get(bare).or_else(|| map.get(&format!("\\{bare}")))
}
