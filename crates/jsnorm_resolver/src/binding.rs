//! Binding and binding table definitions.

use jsnorm_ast::types::{BindingId, ScopeId};
use jsnorm_core::intern::InternedString;
use jsnorm_core::text::TextSpan;

/// How a name came to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Parameter,
    CatchParameter,
    /// The own name of a function expression, visible only in its body.
    FunctionName,
    Arguments,
    /// A `var` declaration introduced by a rewrite.
    Temporary,
    /// Referenced but never declared; lives in the program scope.
    Implicit,
}

impl BindingKind {
    /// Whether the binding was written out in the source (or by a rewrite).
    #[inline]
    pub fn is_explicit(self) -> bool {
        !matches!(self, BindingKind::Implicit | BindingKind::Arguments)
    }

    #[inline]
    pub fn is_lexical(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const)
    }
}

bitflags::bitflags! {
    /// Usage facts collected while resolving.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindingFlags: u8 {
        const NONE       = 0;
        /// Written somewhere outside a preserved subtree.
        const ASSIGNED   = 1 << 0;
        const REFERENCED = 1 << 1;
        /// An implicit global written from strict mode code, where the
        /// write throws unless the global already exists.
        const STRICT_ASSIGNED = 1 << 2;
    }
}

/// A resolved name.
#[derive(Debug, Clone)]
pub struct Binding {
    pub id: BindingId,
    pub name: InternedString,
    pub name_text: String,
    pub kind: BindingKind,
    pub flags: BindingFlags,
    /// The declaring scope.
    pub scope: ScopeId,
    /// First assignment from strict mode code, for implicit globals.
    pub strict_assignment: Option<TextSpan>,
}

impl Binding {
    pub fn new(
        id: BindingId,
        name: InternedString,
        name_text: String,
        kind: BindingKind,
        scope: ScopeId,
    ) -> Self {
        Self {
            id,
            name,
            name_text,
            kind,
            flags: BindingFlags::NONE,
            scope,
            strict_assignment: None,
        }
    }

    #[inline]
    pub fn is_implicit(&self) -> bool {
        self.kind == BindingKind::Implicit
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.flags.contains(BindingFlags::ASSIGNED)
    }

    #[inline]
    pub fn is_strict_assigned(&self) -> bool {
        self.flags.contains(BindingFlags::STRICT_ASSIGNED)
    }

    #[inline]
    pub fn is_referenced(&self) -> bool {
        self.flags.contains(BindingFlags::REFERENCED)
    }
}

/// All bindings of one resolver run, indexed by `BindingId`.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        name: InternedString,
        name_text: &str,
        kind: BindingKind,
        scope: ScopeId,
    ) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings
            .push(Binding::new(id, name, name_text.to_string(), kind, scope));
        id
    }

    pub fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.index())
    }

    pub fn get_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.bindings.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}
