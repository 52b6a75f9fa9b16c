//! Identifier sanitization and uniquification.
//!
//! Every name written to the output passes through a [`NameTable`]. Netlist
//! names may contain any character (`$add$alu.v:12$3`), FIRRTL identifiers
//! may not, and two sanitized names must never collide. One table is shared
//! by all modules of a run, so external names are unique design-wide.

use netfir_common::{Ident, Interner};
use std::collections::HashMap;

/// Words that would parse as FIRRTL syntax if used as identifiers.
const RESERVED: &[&str] = &[
    "circuit", "module", "extmodule", "input", "output", "wire", "reg", "node", "mem", "inst",
    "of", "is", "invalid", "skip", "when", "else", "with", "reset", "UInt", "SInt", "Clock",
    "Analog", "flip", "mux", "validif",
];

/// Maps internal netlist names to unique, valid FIRRTL identifiers.
pub struct NameTable {
    issued: Interner,
    cache: HashMap<String, Ident>,
    counter: u64,
}

impl NameTable {
    /// Creates a table with only the reserved words marked as issued.
    pub fn new() -> Self {
        let issued = Interner::new();
        for word in RESERVED {
            issued.get_or_intern(word);
        }
        Self {
            issued,
            cache: HashMap::new(),
            counter: 0,
        }
    }

    /// Returns the external name for `internal`, allocating it on first use.
    ///
    /// The same internal name always maps to the same external name.
    pub fn canonicalize(&mut self, internal: &str) -> String {
        if let Some(&ident) = self.cache.get(internal) {
            return self.issued.resolve(ident).to_string();
        }
        let mut name = sanitize(internal);
        while self.issued.contains(&name) {
            name.push('_');
        }
        let ident = self.issued.get_or_intern(&name);
        self.cache.insert(internal.to_string(), ident);
        name
    }

    /// Returns a synthetic name `_<n>` that has never been issued.
    pub fn fresh(&mut self) -> String {
        loop {
            let name = format!("_{}", self.counter);
            self.counter += 1;
            if !self.issued.contains(&name) {
                self.issued.get_or_intern(&name);
                return name;
            }
        }
    }

    /// Returns `true` if `external` has been handed out (or is reserved).
    pub fn is_issued(&self, external: &str) -> bool {
        self.issued.contains(external)
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips one leading `\`, replaces characters outside `[A-Za-z0-9_]` with
/// `_`, and replaces a leading digit with `_`.
pub fn sanitize(internal: &str) -> String {
    let bare = internal.strip_prefix('\\').unwrap_or(internal);
    let name: String = bare
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            'a'..='z' | 'A'..='Z' | '_' => c,
            '0'..='9' if i != 0 => c,
            _ => '_',
        })
        .collect();
    if name.is_empty() {
        "_".to_string()
    } else {
        name
    }
}

/// Returns `true` if `name` is a syntactically valid identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('a'..='z' | 'A'..='Z' | '_'))
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rules() {
        assert_eq!(sanitize("\\data_in"), "data_in");
        assert_eq!(sanitize("$add$alu.v:12$3"), "_add_alu_v_12_3");
        assert_eq!(sanitize("\\3state"), "_state");
        assert_eq!(sanitize("\\\\x"), "_x");
        assert_eq!(sanitize("\\"), "_");
        assert_eq!(sanitize("a[3]"), "a_3_");
    }

    #[test]
    fn canonicalize_is_memoized() {
        let mut names = NameTable::new();
        let a = names.canonicalize("\\a");
        assert_eq!(a, "a");
        assert_eq!(names.canonicalize("\\a"), "a");
    }

    #[test]
    fn collisions_append_underscore() {
        let mut names = NameTable::new();
        assert_eq!(names.canonicalize("\\a.b"), "a_b");
        assert_eq!(names.canonicalize("\\a_b"), "a_b_");
        assert_eq!(names.canonicalize("\\a$b"), "a_b__");
    }

    #[test]
    fn reserved_words_are_avoided() {
        let mut names = NameTable::new();
        assert_eq!(names.canonicalize("\\wire"), "wire_");
        assert_eq!(names.canonicalize("\\input"), "input_");
    }

    #[test]
    fn fresh_skips_issued_names() {
        let mut names = NameTable::new();
        assert_eq!(names.canonicalize("\\_1"), "_1");
        assert_eq!(names.fresh(), "_0");
        assert_eq!(names.fresh(), "_2");
        assert_eq!(names.canonicalize("\\_3"), "_3");
        assert_eq!(names.canonicalize("\\_2"), "_2_");
        assert_eq!(names.fresh(), "_4");
    }

    #[test]
    fn distinct_internal_names_get_distinct_valid_names() {
        let inputs = [
            "\\a", "a", "$a", "\\$a", "\\a b", "\\1a", "_a", "\\a_", "$auto$x:1$2", "\\mem[0]",
            "\\mux", "_0", "\\_0",
        ];
        let mut names = NameTable::new();
        let mut seen = std::collections::HashSet::new();
        for input in inputs {
            let external = names.canonicalize(input);
            assert!(is_valid_identifier(&external), "{external}");
            assert!(seen.insert(external.clone()), "duplicate {external}");
        }
        for _ in 0..5 {
            let fresh = names.fresh();
            assert!(seen.insert(fresh.clone()), "fresh reused {fresh}");
            assert!(names.is_issued(&fresh));
        }
    }
}
