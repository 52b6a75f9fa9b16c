//! Module names for parameterized module variants.
//!
//! A `$paramod` cell type encodes the base module and its parameter values,
//! e.g. `$paramod\sub\W=8`. The instantiated module is named by replacing
//! every separator in the tag with `_`:
//!
//! | character | replacement |
//! |-----------|-------------|
//! | `\`       | `_`         |
//! | `=`       | `_`         |
//! | `'`       | `_`         |
//! | `$`       | `_`         |
//!
//! All other characters are kept.

const SEPARATORS: [char; 4] = ['\\', '=', '\'', '$'];

/// Maps a `$paramod` type tag to a module name. Already-mangled names map
/// to themselves, so the two forms can be compared.
pub fn paramod_module_name(tag: &str) -> String {
    tag.chars()
        .map(|c| if SEPARATORS.contains(&c) { '_' } else { c })
        .collect()
}
