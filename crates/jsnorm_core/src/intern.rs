//! String interning for binding names.
//!
//! Scope tables key their declared names by `InternedString`, so lookups
//! along a scope chain compare integers instead of strings. Every
//! normalization run owns its own interner; nothing is shared across files.

use lasso::{Rodeo, Spur};
use std::fmt;

/// An interned string handle. Comparing two handles is an integer comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Single-owner string interner.
#[derive(Default)]
pub struct StringInterner {
    rodeo: Rodeo,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Intern a string, returning the existing handle if already present.
    #[inline]
    pub fn intern(&mut self, s: &str) -> InternedString {
        InternedString(self.rodeo.get_or_intern(s))
    }

    /// Look up an already-interned string without interning it if absent.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString)
    }

    /// Resolve a handle back to its string content.
    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
