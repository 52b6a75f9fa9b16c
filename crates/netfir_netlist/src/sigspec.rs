//! Bit-level signal vectors.
//!
//! A [`SigSpec`] is an ordered, least-significant-bit-first list of
//! [`SigBit`]s, each either a constant or one bit of a wire. Cells, ports and
//! connections all refer to signals through `SigSpec`s.

use crate::ids::WireId;
use netfir_common::{Logic, LogicVec};
use serde::{Deserialize, Serialize};

/// A single bit of a signal.
///
/// In JSON a constant bit is one of `"0"`, `"1"`, `"x"`, `"z"` and a wire bit
/// is `{"wire": <id>, "offset": <bit>}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigBit {
    /// A constant logic value.
    Const(Logic),
    /// Bit `offset` of `wire`.
    Wire {
        /// The wire.
        wire: WireId,
        /// Bit position within the wire.
        offset: u32,
    },
}

/// A maximal run of bits sharing a source, as produced by [`SigSpec::chunks`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SigChunk {
    /// Consecutive constant bits, least significant first.
    Const(Vec<Logic>),
    /// `width` consecutive bits of `wire` starting at `offset`.
    Wire {
        /// The wire.
        wire: WireId,
        /// Lowest bit position covered.
        offset: u32,
        /// Number of bits covered.
        width: u32,
    },
}

impl SigChunk {
    /// Number of bits in the chunk.
    pub fn width(&self) -> u32 {
        match self {
            SigChunk::Const(bits) => bits.len() as u32,
            SigChunk::Wire { width, .. } => *width,
        }
    }
}

/// An ordered vector of signal bits, least significant first.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigSpec(Vec<SigBit>);

impl SigSpec {
    /// Creates an empty signal.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a signal from LSB-first bits.
    pub fn from_bits(bits: impl IntoIterator<Item = SigBit>) -> Self {
        Self(bits.into_iter().collect())
    }

    /// Bits `offset .. offset + width` of `wire`.
    pub fn wire_range(wire: WireId, offset: u32, width: u32) -> Self {
        Self((offset..offset + width).map(|offset| SigBit::Wire { wire, offset }).collect())
    }

    /// All `width` bits of `wire`.
    pub fn wire(wire: WireId, width: u32) -> Self {
        Self::wire_range(wire, 0, width)
    }

    /// A constant signal with the bits of `value`.
    pub fn constant(value: &LogicVec) -> Self {
        Self(value.iter().map(SigBit::Const).collect())
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the signal has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns bit `index`, if in range.
    pub fn bit(&self, index: usize) -> Option<SigBit> {
        self.0.get(index).copied()
    }

    /// The bits, least significant first.
    pub fn bits(&self) -> &[SigBit] {
        &self.0
    }

    /// Iterates over the bits, least significant first.
    pub fn iter(&self) -> impl Iterator<Item = SigBit> + '_ {
        self.0.iter().copied()
    }

    /// Appends `other` above the current most significant bit.
    pub fn append(&mut self, other: &SigSpec) {
        self.0.extend_from_slice(&other.0);
    }

    /// Returns bits `offset .. offset + len`, clipped to the signal.
    pub fn extract(&self, offset: usize, len: usize) -> SigSpec {
        let start = offset.min(self.0.len());
        let end = offset.saturating_add(len).min(self.0.len());
        Self(self.0[start..end].to_vec())
    }

    /// Splits the signal into maximal runs of constants or of consecutive
    /// bits of one wire, least significant run first.
    pub fn chunks(&self) -> Vec<SigChunk> {
        let mut chunks: Vec<SigChunk> = Vec::new();
        for bit in self.iter() {
            let extended = match (bit, chunks.last_mut()) {
                (SigBit::Const(value), Some(SigChunk::Const(run))) => {
                    run.push(value);
                    true
                }
                (
                    SigBit::Wire { wire, offset },
                    Some(SigChunk::Wire {
                        wire: run_wire,
                        offset: run_offset,
                        width,
                    }),
                ) if *run_wire == wire && *run_offset + *width == offset => {
                    *width += 1;
                    true
                }
                _ => false,
            };
            if !extended {
                chunks.push(match bit {
                    SigBit::Const(value) => SigChunk::Const(vec![value]),
                    SigBit::Wire { wire, offset } => SigChunk::Wire {
                        wire,
                        offset,
                        width: 1,
                    },
                });
            }
        }
        chunks
    }

    /// Returns `true` if every bit is a constant.
    pub fn is_fully_const(&self) -> bool {
        self.iter().all(|b| matches!(b, SigBit::Const(_)))
    }

    /// Returns the constant value if every bit is a constant.
    pub fn as_const(&self) -> Option<LogicVec> {
        self.iter()
            .map(|b| match b {
                SigBit::Const(v) => Some(v),
                SigBit::Wire { .. } => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(LogicVec::from_bits)
    }
}

impl From<Vec<SigBit>> for SigSpec {
    fn from(bits: Vec<SigBit>) -> Self {
        Self(bits)
    }
}
