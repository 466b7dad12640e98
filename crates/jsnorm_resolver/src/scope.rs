//! The scope tree produced by one resolver run.
//!
//! Scopes are stored flat and linked by `ScopeId`; the parent link is used
//! for lookup only. Each function (and the program) keeps the counters for
//! the temporaries and labels minted in its body.

use crate::binding::{Binding, BindingFlags, BindingKind, BindingTable};
use jsnorm_ast::types::{BindingId, ScopeId};
use jsnorm_core::collections::{FxHashSet, FxIndexMap};
use jsnorm_core::intern::{InternedString, StringInterner};
use jsnorm_core::text::TextSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Program,
    /// A function or arrow function body, including its parameters.
    Function,
    Block,
    Catch,
}

/// One lexical binding region.
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// The nearest enclosing function or program scope (itself for those).
    pub function_scope: ScopeId,
    pub is_arrow: bool,
    /// Inside a `"use strict"` prologue, or nested in code that is.
    pub is_strict: bool,
    /// Declared names in declaration order.
    names: FxIndexMap<InternedString, BindingId>,
    /// Statement labels used in the function body. Function scopes only.
    labels: FxHashSet<InternedString>,
    next_temporary: u32,
    next_label: u32,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>, function_scope: ScopeId) -> Self {
        Self {
            id,
            kind,
            parent,
            function_scope,
            is_arrow: false,
            is_strict: false,
            names: FxIndexMap::default(),
            labels: FxHashSet::default(),
            next_temporary: 0,
            next_label: 0,
        }
    }

    pub fn get(&self, name: InternedString) -> Option<BindingId> {
        self.names.get(&name).copied()
    }

    /// Declared bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = BindingId> + '_ {
        self.names.values().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scopes, bindings and the interner for their names.
#[derive(Debug)]
pub struct ScopeTree {
    interner: StringInterner,
    scopes: Vec<Scope>,
    bindings: BindingTable,
    /// Every name declared or referenced anywhere, plus minted temporaries.
    used_names: FxHashSet<InternedString>,
    /// Temporaries minted since the last `take_minted_temporaries`, per
    /// function scope.
    minted: FxIndexMap<ScopeId, Vec<String>>,
}

impl ScopeTree {
    pub(crate) fn new() -> Self {
        let mut tree = Self {
            interner: StringInterner::new(),
            scopes: Vec::new(),
            bindings: BindingTable::new(),
            used_names: FxHashSet::default(),
            minted: FxIndexMap::default(),
        };
        tree.push_scope(ScopeKind::Program, None);
        tree
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub(crate) fn intern(&mut self, name: &str) -> InternedString {
        self.interner.intern(name)
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    pub(crate) fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let function_scope = match (kind, parent) {
            (ScopeKind::Program | ScopeKind::Function, _) | (_, None) => id,
            (_, Some(parent)) => self.scopes[parent.index()].function_scope,
        };
        let mut scope = Scope::new(id, kind, parent, function_scope);
        scope.is_strict = parent.is_some_and(|parent| self.scopes[parent.index()].is_strict);
        self.scopes.push(scope);
        id
    }

    pub(crate) fn mark_arrow(&mut self, id: ScopeId) {
        self.scopes[id.index()].is_arrow = true;
    }

    pub(crate) fn mark_strict(&mut self, id: ScopeId) {
        self.scopes[id.index()].is_strict = true;
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn program_scope(&self) -> &Scope {
        &self.scopes[ScopeId::PROGRAM.index()]
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Declare `name` in `scope`. Redeclaring an existing name returns the
    /// existing binding, except that anything replaces a function
    /// expression's own name.
    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str, kind: BindingKind) -> BindingId {
        let key = self.intern(name);
        self.used_names.insert(key);
        if let Some(existing) = self.scopes[scope.index()].get(key) {
            let replace = self
                .bindings
                .get(existing)
                .is_some_and(|b| b.kind == BindingKind::FunctionName && kind != BindingKind::FunctionName);
            if !replace {
                if kind == BindingKind::Function {
                    if let Some(binding) = self.bindings.get_mut(existing) {
                        if binding.kind == BindingKind::Var {
                            binding.kind = BindingKind::Function;
                        }
                    }
                }
                return existing;
            }
        }
        let id = self.bindings.push(key, name, kind, scope);
        self.scopes[scope.index()].names.insert(key, id);
        id
    }

    pub(crate) fn add_flags(&mut self, id: BindingId, flags: BindingFlags) {
        if let Some(binding) = self.bindings.get_mut(id) {
            binding.flags |= flags;
        }
    }

    /// Note a strict mode write to an implicit global; other bindings are
    /// left alone.
    pub(crate) fn note_strict_assignment(&mut self, id: BindingId, span: TextSpan) {
        if let Some(binding) = self.bindings.get_mut(id) {
            if binding.is_implicit() {
                binding.flags |= BindingFlags::STRICT_ASSIGNED;
                binding.strict_assignment.get_or_insert(span);
            }
        }
    }

    /// Resolve `name` along the scope chain starting at `scope`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let key = self.interner.get(name)?;
        self.lookup_interned(scope, key)
    }

    pub(crate) fn lookup_interned(&self, scope: ScopeId, key: InternedString) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(binding) = scope.get(key) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    /// Whether a builtin global such as `Object` may not mean the builtin:
    /// some scope declares the name, or code assigns to the global.
    pub fn is_shadowed_global(&self, name: &str) -> bool {
        let Some(key) = self.interner.get(name) else {
            return false;
        };
        self.scopes.iter().any(|scope| {
            scope
                .get(key)
                .and_then(|id| self.bindings.get(id))
                .is_some_and(|b| b.kind.is_explicit() || b.is_assigned())
        })
    }

    /// Implicit globals that are assigned somewhere and only from sloppy
    /// mode code, in first-occurrence order. These may be declared.
    pub fn assigned_implicit_globals(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.implicit_globals()
            .filter(|b| b.is_assigned() && !b.is_strict_assigned())
    }

    /// Implicit globals assigned from strict mode code. Declaring one would
    /// turn a `ReferenceError` into a successful write.
    pub fn strict_assigned_implicit_globals(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.implicit_globals().filter(|b| b.is_strict_assigned())
    }

    fn implicit_globals(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.program_scope()
            .bindings()
            .filter_map(|id| self.bindings.get(id))
            .filter(|b| b.is_implicit())
    }

    pub(crate) fn note_name(&mut self, key: InternedString) {
        self.used_names.insert(key);
    }

    pub(crate) fn add_label(&mut self, scope: ScopeId, label: &str) {
        let key = self.intern(label);
        let function_scope = self.scopes[scope.index()].function_scope;
        self.scopes[function_scope.index()].labels.insert(key);
    }

    // ========================================================================
    // Temporaries and labels
    // ========================================================================

    /// Mint a fresh `$tmpN` for the function enclosing `scope`.
    ///
    /// The name is unused anywhere in the tree, so it can neither shadow
    /// nor be captured by any existing binding.
    pub fn mint_temporary(&mut self, scope: ScopeId) -> String {
        let function_scope = self.scopes[scope.index()].function_scope;
        loop {
            let counter = &mut self.scopes[function_scope.index()].next_temporary;
            let name = format!("$tmp{}", *counter);
            *counter += 1;
            let key = self.interner.intern(&name);
            if self.used_names.insert(key) {
                self.minted
                    .entry(function_scope)
                    .or_default()
                    .push(name.clone());
                return name;
            }
        }
    }

    /// Mint a fresh `$labelN` for the function enclosing `scope`.
    pub fn mint_label(&mut self, scope: ScopeId) -> String {
        let function_scope = self.scopes[scope.index()].function_scope;
        loop {
            let function = &mut self.scopes[function_scope.index()];
            let name = format!("$label{}", function.next_label);
            function.next_label += 1;
            let key = self.interner.intern(&name);
            let function = &mut self.scopes[function_scope.index()];
            if function.labels.insert(key) {
                return name;
            }
        }
    }

    /// Whether `label` is used anywhere in the function enclosing `scope`.
    pub fn has_label(&self, scope: ScopeId, label: &str) -> bool {
        let function_scope = self.scopes[scope.index()].function_scope;
        self.interner
            .get(label)
            .is_some_and(|key| self.scopes[function_scope.index()].labels.contains(&key))
    }

    /// Drain the temporaries minted for one function scope.
    pub fn take_temporaries_of(&mut self, function_scope: ScopeId) -> Vec<String> {
        self.minted.shift_remove(&function_scope).unwrap_or_default()
    }

    /// Drain the temporaries minted so far, grouped by function scope in
    /// the order the scopes first minted one.
    pub fn take_minted_temporaries(&mut self) -> FxIndexMap<ScopeId, Vec<String>> {
        std::mem::take(&mut self.minted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let mut tree = ScopeTree::new();
        let x = tree.declare(ScopeId::PROGRAM, "x", BindingKind::Var);
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        let block = tree.push_scope(ScopeKind::Block, Some(f));
        assert_eq!(tree.lookup(block, "x"), Some(x));
        assert_eq!(tree.lookup(block, "y"), None);
        assert_eq!(tree.scope(block).function_scope, f);
    }

    #[test]
    fn test_redeclaration_keeps_binding() {
        let mut tree = ScopeTree::new();
        let a = tree.declare(ScopeId::PROGRAM, "a", BindingKind::Var);
        let b = tree.declare(ScopeId::PROGRAM, "a", BindingKind::Function);
        assert_eq!(a, b);
        assert_eq!(tree.binding(a).map(|b| b.kind), Some(BindingKind::Function));
    }

    #[test]
    fn test_var_replaces_function_expression_name() {
        let mut tree = ScopeTree::new();
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        let own = tree.declare(f, "f", BindingKind::FunctionName);
        let local = tree.declare(f, "f", BindingKind::Var);
        assert_ne!(own, local);
        assert_eq!(tree.lookup(f, "f"), Some(local));
    }

    #[test]
    fn test_mint_temporary_skips_used_names() {
        let mut tree = ScopeTree::new();
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        let block = tree.push_scope(ScopeKind::Block, Some(f));
        tree.declare(block, "$tmp0", BindingKind::Let);
        assert_eq!(tree.mint_temporary(block), "$tmp1");
        assert_eq!(tree.mint_temporary(f), "$tmp2");
        assert_eq!(tree.mint_temporary(ScopeId::PROGRAM), "$tmp3");

        let minted = tree.take_minted_temporaries();
        assert_eq!(minted.get(&f), Some(&vec!["$tmp1".to_string(), "$tmp2".to_string()]));
        assert!(tree.take_minted_temporaries().is_empty());
    }

    #[test]
    fn test_shadowed_global() {
        let mut tree = ScopeTree::new();
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        let implicit = tree.declare(ScopeId::PROGRAM, "Symbol", BindingKind::Implicit);
        assert!(!tree.is_shadowed_global("Symbol"));
        tree.add_flags(implicit, BindingFlags::ASSIGNED);
        assert!(tree.is_shadowed_global("Symbol"));

        tree.declare(f, "Object", BindingKind::Parameter);
        assert!(tree.is_shadowed_global("Object"));
        assert!(!tree.is_shadowed_global("TypeError"));
    }

    #[test]
    fn test_take_temporaries_of_one_scope() {
        let mut tree = ScopeTree::new();
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        tree.mint_temporary(f);
        tree.mint_temporary(ScopeId::PROGRAM);
        assert_eq!(tree.take_temporaries_of(f), vec!["$tmp0".to_string()]);
        assert!(tree.take_temporaries_of(f).is_empty());
        assert_eq!(tree.take_minted_temporaries().len(), 1);
    }

    #[test]
    fn test_mint_label_avoids_existing_labels() {
        let mut tree = ScopeTree::new();
        tree.add_label(ScopeId::PROGRAM, "$label0");
        assert_eq!(tree.mint_label(ScopeId::PROGRAM), "$label1");
        assert_eq!(tree.mint_label(ScopeId::PROGRAM), "$label2");
        assert!(tree.has_label(ScopeId::PROGRAM, "$label2"));
    }

    #[test]
    fn test_strictness_is_inherited() {
        let mut tree = ScopeTree::new();
        let f = tree.push_scope(ScopeKind::Function, Some(ScopeId::PROGRAM));
        tree.mark_strict(f);
        let block = tree.push_scope(ScopeKind::Block, Some(f));
        let g = tree.push_scope(ScopeKind::Function, Some(block));
        assert!(!tree.program_scope().is_strict);
        assert!(tree.scope(block).is_strict && tree.scope(g).is_strict);
    }

    #[test]
    fn test_strict_assignment_keeps_global_undeclared() {
        let mut tree = ScopeTree::new();
        let loose = tree.declare(ScopeId::PROGRAM, "loose", BindingKind::Implicit);
        let strict = tree.declare(ScopeId::PROGRAM, "strict", BindingKind::Implicit);
        let local = tree.declare(ScopeId::PROGRAM, "local", BindingKind::Var);
        for id in [loose, strict, local] {
            tree.add_flags(id, BindingFlags::ASSIGNED);
        }
        tree.note_strict_assignment(strict, TextSpan::new(4, 6));
        tree.note_strict_assignment(strict, TextSpan::new(20, 6));
        tree.note_strict_assignment(local, TextSpan::new(30, 5));

        let declared: Vec<_> = tree.assigned_implicit_globals().map(|b| b.name_text.as_str()).collect();
        assert_eq!(declared, vec!["loose"]);
        let reported: Vec<_> = tree
            .strict_assigned_implicit_globals()
            .map(|b| (b.name_text.as_str(), b.strict_assignment))
            .collect();
        assert_eq!(reported, vec![("strict", Some(TextSpan::new(4, 6)))]);
        assert!(tree.binding(local).is_some_and(|b| !b.is_strict_assigned()));
    }
}
