//! Constant values for cell parameters and attributes.

use netfir_common::{Logic, LogicVec};
use serde::{Deserialize, Serialize};

/// A constant parameter or attribute value.
///
/// Deserialized untagged: JSON booleans become `Bool`, integers `Int`, strings
/// made only of `0 1 x z` become `Bits`, and any other string is a `String`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    /// A boolean constant.
    Bool(bool),
    /// An integer constant.
    Int(i64),
    /// A bit pattern, most significant bit first when serialized.
    Bits(LogicVec),
    /// A string constant.
    String(String),
}

impl ConstValue {
    /// Interprets the value as an integer.
    ///
    /// Bit patterns are read as unsigned with `x`/`z` as zero. Strings have no
    /// integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Bool(b) => Some(i64::from(*b)),
            ConstValue::Int(v) => Some(*v),
            ConstValue::Bits(bits) => Some(bits.to_u64_lossy() as i64),
            ConstValue::String(_) => None,
        }
    }

    /// Interprets the value as a boolean: any set bit is `true`.
    pub fn as_bool(&self) -> bool {
        match self {
            ConstValue::Bool(b) => *b,
            ConstValue::Int(v) => *v != 0,
            ConstValue::Bits(bits) => bits.iter().any(|b| b == Logic::One),
            ConstValue::String(s) => !s.is_empty(),
        }
    }

    /// Returns bit `index` of the value.
    ///
    /// Integers are two's complement and sign-extend past bit 63; bit
    /// patterns read as `Zero` past their width.
    pub fn bit(&self, index: u32) -> Logic {
        match self {
            ConstValue::Bool(b) => Logic::from(index == 0 && *b),
            ConstValue::Int(v) => Logic::from((v >> index.min(63)) & 1 != 0),
            ConstValue::Bits(bits) if index < bits.width() => bits.get(index),
            ConstValue::Bits(_) | ConstValue::String(_) => Logic::Zero,
        }
    }

    /// Returns the value as a string when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConstValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Bits(bits) => write!(f, "{}'b{bits}", bits.width()),
            ConstValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}
