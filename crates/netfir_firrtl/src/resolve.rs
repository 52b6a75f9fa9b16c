//! Output wire resolution.
//!
//! After every cell and connection has registered its drivers, each
//! non-input wire is rebuilt from the [`DriverMap`] as a sequence of
//! segments, least significant first.

use crate::driver::{DriverId, DriverMap};
use crate::expr::Expr;
use netfir_netlist::WireId;

/// A run of wire bits with a single source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Segment {
    /// Bits `lo..=hi` of a driver expression.
    Driven {
        /// The driving expression.
        driver: DriverId,
        /// Highest driver bit.
        hi: u32,
        /// Lowest driver bit.
        lo: u32,
    },
    /// `width` bits that nothing drives.
    Undriven {
        /// Number of bits.
        width: u32,
    },
}

impl Segment {
    /// Number of wire bits covered.
    pub fn width(&self) -> u32 {
        match *self {
            Segment::Driven { hi, lo, .. } => hi - lo + 1,
            Segment::Undriven { width } => width,
        }
    }
}

/// Splits a wire of `width` bits into maximal driven and undriven runs.
///
/// A driven run continues while consecutive wire bits map to consecutive
/// bits of the same driver. The segment widths always sum to `width`.
pub fn segments(wire: WireId, width: u32, drivers: &DriverMap) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for offset in 0..width {
        let bit = drivers.get(wire, offset);
        let extended = match (bit, out.last_mut()) {
            (Some((driver, at)), Some(Segment::Driven { driver: d, hi, .. }))
                if *d == driver && *hi + 1 == at =>
            {
                *hi = at;
                true
            }
            (None, Some(Segment::Undriven { width })) => {
                *width += 1;
                true
            }
            _ => false,
        };
        if !extended {
            out.push(match bit {
                Some((driver, at)) => Segment::Driven {
                    driver,
                    hi: at,
                    lo: at,
                },
                None => Segment::Undriven { width: 1 },
            });
        }
    }
    out
}

/// Returns `true` if no bit of the wire is driven.
pub fn is_undriven(segments: &[Segment]) -> bool {
    segments
        .iter()
        .all(|s| matches!(s, Segment::Undriven { .. }))
}

/// Builds the driving expression for a wire from its segments.
///
/// A driven segment covering its whole driver is a bare reference, otherwise
/// `bits(driver, hi, lo)`. Every undriven bit becomes one copy of `marker`,
/// which is only called if some bit is undriven.
pub fn segments_expr(
    segments: &[Segment],
    drivers: &DriverMap,
    mut marker: impl FnMut() -> String,
) -> Option<Expr> {
    let mut terms = Vec::new();
    for segment in segments {
        match *segment {
            Segment::Driven { driver, hi, lo } => {
                let d = drivers.driver(driver);
                let name = Expr::reference(d.name.clone());
                if lo == 0 && hi + 1 == d.width {
                    terms.push(name);
                } else {
                    terms.push(name.bits(hi, lo));
                }
            }
            Segment::Undriven { width } => {
                let m = marker();
                terms.extend((0..width).map(|_| Expr::reference(m.clone())));
            }
        }
    }
    Expr::concat(terms)
}
