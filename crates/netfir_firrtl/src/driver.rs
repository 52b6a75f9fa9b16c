//! Per-bit record of which generated expression drives each wire bit.

use netfir_netlist::{Arena, ArenaId, SigBit, SigSpec, WireId};
use std::collections::HashMap;

/// Index of a [`Driver`] in a [`DriverMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DriverId(u32);

impl ArenaId for DriverId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

/// A named expression that drives one or more wire bits.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Driver {
    /// External name, e.g. `_add_Y`, `ram.r0.data` or `u_sub.q`.
    pub name: String,
    /// Width of the named expression.
    pub width: u32,
}

/// Maps `(wire, bit)` to `(driver, bit within driver)`.
///
/// Registering a bit that already has a driver replaces it.
#[derive(Default)]
pub struct DriverMap {
    drivers: Arena<DriverId, Driver>,
    bits: HashMap<(WireId, u32), (DriverId, u32)>,
}

impl DriverMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that bit `i` of `name` drives `sig[i]`. Constant bits of `sig`
    /// are skipped.
    pub fn register(&mut self, name: impl Into<String>, sig: &SigSpec) -> DriverId {
        let id = self.drivers.alloc(Driver {
            name: name.into(),
            width: sig.len() as u32,
        });
        for (i, bit) in sig.iter().enumerate() {
            if let SigBit::Wire { wire, offset } = bit {
                self.bits.insert((wire, offset), (id, i as u32));
            }
        }
        id
    }

    /// Returns the driver and driver bit for a wire bit.
    pub fn get(&self, wire: WireId, offset: u32) -> Option<(DriverId, u32)> {
        self.bits.get(&(wire, offset)).copied()
    }

    /// Returns a registered driver.
    pub fn driver(&self, id: DriverId) -> &Driver {
        &self.drivers[id]
    }

    /// Number of driven wire bits.
    pub fn driven_bits(&self) -> usize {
        self.bits.len()
    }
}
