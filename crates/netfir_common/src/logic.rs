//! Four-state logic values as they appear in netlist constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single 4-state logic value.
///
/// - `Zero` / `One` are driven constants
/// - `X` is a don't-care / unknown value
/// - `Z` is high impedance
///
/// Serialized as the single characters `"0"`, `"1"`, `"x"` and `"z"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logic {
    /// Logic low (0).
    #[serde(rename = "0")]
    Zero,
    /// Logic high (1).
    #[serde(rename = "1")]
    One,
    /// Unknown or don't-care.
    #[serde(rename = "x")]
    X,
    /// Undriven.
    #[serde(rename = "z")]
    Z,
}

impl Logic {
    /// Parses one character of a netlist bit string; `X`/`Z` may be upper case.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Returns the lowercase character for this value.
    pub fn as_char(self) -> char {
        match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'x',
            Logic::Z => 'z',
        }
    }

    /// Returns `true` for `Zero` and `One`.
    pub fn is_defined(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
