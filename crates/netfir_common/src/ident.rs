//! Interned names.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A key into an [`Interner`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// The raw key value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `into_usize` and `try_from_usize` round-trip every value that
// `try_from_usize` accepts, which is exactly the `u32` range.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// A set of strings with stable [`Ident`] keys.
///
/// The name allocator keeps every identifier it has handed out here, so
/// "is this name taken?" is a single lookup.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// An empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Returns the key for `s`, adding it on first use.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Whether `s` has been interned.
    pub fn contains(&self, s: &str) -> bool {
        self.rodeo.contains(s)
    }

    /// The string behind `ident`.
    ///
    /// # Panics
    ///
    /// Panics if `ident` came from a different interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
