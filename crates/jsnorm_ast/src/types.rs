//! Flag types and id handles for the AST.

use std::fmt;

bitflags::bitflags! {
    /// Flags for AST nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        const NONE        = 0;
        /// Created by a rewrite rather than parsed from source.
        const SYNTHESIZED = 1 << 0;
        /// Subtree deliberately left unnormalized.
        const PRESERVED   = 1 << 1;
        /// A rewrite's reference to a builtin such as `Object`; never looked
        /// up through a `with` object.
        const INTRINSIC   = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Token flags set by the scanner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                 = 0;
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED         = 1 << 1;
        const SCIENTIFIC           = 1 << 2;
        const OCTAL                = 1 << 3;
        const HEX_SPECIFIER        = 1 << 4;
        const BINARY_SPECIFIER     = 1 << 5;
        const OCTAL_SPECIFIER      = 1 << 6;
        const UNICODE_ESCAPE       = 1 << 7;
        const IS_INVALID           = 1 << 8;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::OCTAL.bits()
            | Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits();
    }
}

/// Index of a binding in a resolver's scope tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingId({})", self.0)
    }
}

/// Index of a scope in a resolver's scope tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The program scope is always allocated first.
    pub const PROGRAM: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}
