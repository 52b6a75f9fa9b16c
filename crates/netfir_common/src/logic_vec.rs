//! Bit vectors of 4-state logic values, as found in netlist constants.

use crate::logic::Logic;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An LSB-first vector of [`Logic`] values.
///
/// Netlist constants are short (parameters, literal signal chunks), so the
/// values are stored one per byte. The JSON form is the usual MSB-first
/// string, e.g. `"10xz"`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct LogicVec {
    bits: Vec<Logic>,
}

impl LogicVec {
    /// An all-zero vector of `width` bits.
    pub fn new(width: u32) -> Self {
        Self {
            bits: vec![Logic::Zero; width as usize],
        }
    }

    /// Number of bits.
    pub fn width(&self) -> u32 {
        self.bits.len() as u32
    }

    /// The bit at `index` (0 = least significant).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        self.bits[index as usize]
    }

    /// The low `width` bits of `value`; positions past 64 are zero.
    pub fn from_u64(value: u64, width: u32) -> Self {
        Self::from_bits((0..width).map(|i| Logic::from(i < 64 && (value >> i) & 1 == 1)))
    }

    /// Builds a vector from LSB-first logic values.
    pub fn from_bits(bits: impl IntoIterator<Item = Logic>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    /// Parses an MSB-first string of `0 1 x z` (either case).
    ///
    /// Returns `None` on any other character.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let mut bits = s.chars().map(Logic::from_char).collect::<Option<Vec<_>>>()?;
        bits.reverse();
        Some(Self { bits })
    }

    /// The unsigned value, if every bit is 0 or 1 and the width fits in 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.bits.len() > 64 || !self.bits.iter().all(|b| b.is_defined()) {
            return None;
        }
        Some(self.to_u64_lossy())
    }

    /// The unsigned value with X and Z read as zero.
    ///
    /// Bits above position 63 are ignored.
    pub fn to_u64_lossy(&self) -> u64 {
        self.bits
            .iter()
            .take(64)
            .enumerate()
            .filter(|&(_, &b)| b == Logic::One)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }

    /// Iterates from least to most significant.
    pub fn iter(&self) -> impl Iterator<Item = Logic> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits
            .iter()
            .rev()
            .try_for_each(|b| write!(f, "{}", b.as_char()))
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b{self}", self.width())
    }
}

impl Serialize for LogicVec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogicVec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BitString;

        impl Visitor<'_> for BitString {
            type Value = LogicVec;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string of 0, 1, x and z characters")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LogicVec, E> {
                LogicVec::from_binary_str(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(BitString)
    }
}
