//! Modules: wires, cells and direct connections.

use crate::arena::Arena;
use crate::cell::Cell;
use crate::const_value::ConstValue;
use crate::error::NetlistError;
use crate::ids::{CellId, WireId};
use crate::sigspec::{SigBit, SigSpec};
use crate::wire::{lookup, Wire};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A direct wire-to-wire assignment that bypasses any cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// The driven signal.
    pub dst: SigSpec,
    /// The driving signal, same width as `dst`.
    pub src: SigSpec,
}

/// A hardware module.
///
/// Wires keep their insertion order, which is also the port order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The module name, e.g. `\top`.
    pub name: String,
    /// Module attributes such as `top`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, ConstValue>,
    /// All wires, ports included.
    #[serde(default)]
    pub wires: Arena<WireId, Wire>,
    /// All cells.
    #[serde(default)]
    pub cells: Arena<CellId, Cell>,
    /// Direct connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            wires: Arena::new(),
            cells: Arena::new(),
            connections: Vec::new(),
        }
    }

    /// Adds a wire and returns its ID.
    pub fn add_wire(&mut self, wire: Wire) -> WireId {
        self.wires.alloc(wire)
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        self.cells.alloc(cell)
    }

    /// Adds a direct connection `dst = src`.
    pub fn connect(&mut self, dst: SigSpec, src: SigSpec) {
        self.connections.push(Connection { dst, src });
    }

    /// Finds a wire by name, accepting the name with or without a leading `\`.
    pub fn wire_by_name(&self, name: &str) -> Option<(WireId, &Wire)> {
        let bare = name.strip_prefix('\\').unwrap_or(name);
        self.wires
            .iter()
            .find(|(_, w)| w.name.strip_prefix('\\').unwrap_or(&w.name) == bare)
    }

    /// Iterates over port wires in declaration order.
    pub fn ports(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().filter(|(_, w)| w.is_port())
    }

    /// Looks up an attribute, accepting the name with or without a leading `\`.
    pub fn attribute(&self, name: &str) -> Option<&ConstValue> {
        lookup(&self.attributes, name)
    }

    /// Checks wire widths, signal references and connection widths.
    pub fn validate(&self) -> Result<(), NetlistError> {
        for wire in self.wires.values() {
            if wire.width == 0 {
                return Err(NetlistError::ZeroWidthWire {
                    module: self.name.clone(),
                    wire: wire.name.clone(),
                });
            }
        }
        for cell in self.cells.values() {
            for conn in &cell.connections {
                self.check_signal(&conn.signal, || format!("port `{}` of cell `{}`", conn.port, cell.name))?;
            }
        }
        for (index, conn) in self.connections.iter().enumerate() {
            self.check_signal(&conn.dst, || format!("connection #{index}"))?;
            self.check_signal(&conn.src, || format!("connection #{index}"))?;
            if conn.dst.len() != conn.src.len() {
                return Err(NetlistError::WidthMismatch {
                    module: self.name.clone(),
                    index,
                    dst: conn.dst.len(),
                    src: conn.src.len(),
                });
            }
        }
        Ok(())
    }

    fn check_signal(
        &self,
        sig: &SigSpec,
        context: impl Fn() -> String,
    ) -> Result<(), NetlistError> {
        for bit in sig.iter() {
            if let SigBit::Wire { wire, offset } = bit {
                let Some(w) = self.wires.get(wire) else {
                    return Err(NetlistError::DanglingWire {
                        module: self.name.clone(),
                        context: context(),
                        wire: wire.as_raw(),
                    });
                };
                if offset >= w.width {
                    return Err(NetlistError::BitOutOfRange {
                        module: self.name.clone(),
                        context: context(),
                        wire: w.name.clone(),
                        offset,
                        width: w.width,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::PortDirection;

    fn adder() -> Module {
        let mut m = Module::new("\\top");
        let a = m.add_wire(Wire::port("\\a", 4, PortDirection::Input));
        let y = m.add_wire(Wire::port("\\y", 4, PortDirection::Output));
        m.add_wire(Wire::new("$tmp", 2));
        m.connect(SigSpec::wire(y, 4), SigSpec::wire(a, 4));
        m
    }

    #[test]
    fn wire_lookup_and_ports() {
        let m = adder();
        assert_eq!(m.wire_by_name("a").map(|(id, _)| id.as_raw()), Some(0));
        assert_eq!(m.wire_by_name("\\y").map(|(_, w)| w.width), Some(4));
        assert!(m.wire_by_name("nope").is_none());
        assert_eq!(m.ports().count(), 2);
    }

    #[test]
    fn validate_accepts_consistent_module() {
        assert_eq!(adder().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_width_mismatch() {
        let mut m = adder();
        m.connect(
            SigSpec::wire(WireId::from_raw(2), 2),
            SigSpec::wire(WireId::from_raw(0), 3),
        );
        assert!(matches!(
            m.validate(),
            Err(NetlistError::WidthMismatch { index: 1, dst: 2, src: 3, .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_references() {
        let mut m = adder();
        m.add_cell(Cell::new("u", "$not").with_port("A", SigSpec::wire_range(WireId::from_raw(2), 1, 2)));
        assert!(matches!(m.validate(), Err(NetlistError::BitOutOfRange { offset: 2, .. })));

        let mut m = adder();
        m.connect(SigSpec::wire(WireId::from_raw(9), 1), SigSpec::wire(WireId::from_raw(0), 1));
        assert!(matches!(m.validate(), Err(NetlistError::DanglingWire { wire: 9, .. })));
    }

    #[test]
    fn validate_rejects_zero_width() {
        let mut m = Module::new("m");
        m.add_wire(Wire::new("w", 0));
        assert!(matches!(m.validate(), Err(NetlistError::ZeroWidthWire { .. })));
    }

    #[test]
    fn serde_roundtrip() {
        let m = adder();
        let json = serde_json::to_string(&m).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
