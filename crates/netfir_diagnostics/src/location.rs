//! Netlist locations attached to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the netlist a diagnostic points.
///
/// Netlists carry no source text, so a location is the owning module plus an
/// optional item (cell, wire or port) inside it. Displayed as `module.item`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    /// Name of the owning module.
    pub module: Option<String>,
    /// Name of the cell, wire or port within the module.
    pub item: Option<String>,
}

impl Location {
    /// A location that refers to nothing in particular.
    pub const UNKNOWN: Location = Location {
        module: None,
        item: None,
    };

    /// A location naming a whole module.
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            item: None,
        }
    }

    /// A location naming one item inside a module.
    pub fn item(module: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            item: Some(item.into()),
        }
    }

    /// Returns `true` if neither module nor item is known.
    pub fn is_unknown(&self) -> bool {
        self.module.is_none() && self.item.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.module, &self.item) {
            (Some(m), Some(i)) => write!(f, "{m}.{i}"),
            (Some(m), None) => write!(f, "{m}"),
            (None, Some(i)) => write!(f, "{i}"),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Location::item("top", "u_add").to_string(), "top.u_add");
        assert_eq!(Location::module("top").to_string(), "top");
        assert_eq!(Location::UNKNOWN.to_string(), "<unknown>");
    }

    #[test]
    fn unknown() {
        assert!(Location::UNKNOWN.is_unknown());
        assert!(Location::default().is_unknown());
        assert!(!Location::module("m").is_unknown());
    }
}
