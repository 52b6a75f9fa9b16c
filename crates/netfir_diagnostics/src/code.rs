//! Stable diagnostic codes such as `E303` or `W302`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which family a code belongs to; decides its letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// `E`: the run is aborted.
    Error,
    /// `W`: a construct was skipped or approximated.
    Warning,
    /// `I`: progress and summary information.
    Info,
}

impl Category {
    /// The code letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Info => 'I',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' => Some(Category::Error),
            'W' => Some(Category::Warning),
            'I' => Some(Category::Info),
            _ => None,
        }
    }
}

/// A category letter plus a number, shown as `W302`.
///
/// Numbers in the 3xx range belong to the FIRRTL backend. Codes are what
/// `netfir.toml` names in its `allow`/`deny` lists, so they never change
/// meaning once issued.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Family.
    pub category: Category,
    /// Number within the family.
    pub number: u16,
}

impl DiagnosticCode {
    /// Builds a code from its parts.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// `E<number>`.
    pub fn error(number: u16) -> Self {
        Self::new(Category::Error, number)
    }

    /// `W<number>`.
    pub fn warning(number: u16) -> Self {
        Self::new(Category::Warning, number)
    }

    /// `I<number>`.
    pub fn info(number: u16) -> Self {
        Self::new(Category::Info, number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// A string that is not a letter followed by three digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodeError(pub String);

impl fmt::Display for ParseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a diagnostic code", self.0)
    }
}

impl std::error::Error for ParseCodeError {}

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let category = chars.next().and_then(Category::from_prefix);
        let digits = chars.as_str();
        match category {
            Some(category) if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) => {
                let number = digits.parse().map_err(|_| ParseCodeError(s.to_string()))?;
                Ok(Self::new(category, number))
            }
            _ => Err(ParseCodeError(s.to_string())),
        }
    }
}
