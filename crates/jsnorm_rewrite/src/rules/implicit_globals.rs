//! Explicit declarations for assigned globals.
//!
//! By default `x = 1` with no declaration of `x` anywhere gains a
//! `var x;`. With `RewriteOptions::reference_errors` the write goes through
//! the global object instead (`$g.x = 1` after `$g = this;`), so a read of
//! `x` before the first write still throws.

use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::{BindingId, ScopeId};
use jsnorm_ast::visitor::{walk_mut_expression, walk_mut_statement};
use jsnorm_ast::{AssignmentOperator, AstVisitorMut};
use jsnorm_core::collections::FxHashSet;
use jsnorm_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use jsnorm_resolver::ScopeTree;

use crate::query::prologue_len;

/// Declare `var name;` for each implicit global that is assigned somewhere,
/// in first-occurrence order, after any directive prologue. Returns how many
/// were added.
pub(crate) fn declare_implicit_globals(program: &mut Program, tree: &ScopeTree) -> usize {
    if program.data.is_preserved() {
        return 0;
    }
    let declarations: Vec<Statement> = tree
        .assigned_implicit_globals()
        .map(|binding| factory::var_declaration(binding.name_text.clone(), None))
        .collect();
    let count = declarations.len();
    if count > 0 {
        let at = prologue_len(&program.statements);
        program.statements.splice(at..at, declarations);
    }
    count
}

/// Rewrite plain assignments to sloppy-mode implicit globals as writes
/// through a program temporary holding the global object. `global` names
/// that temporary once it exists; it is minted and initialized on first
/// use. Returns how many assignments were rewritten.
pub(crate) fn route_through_global_object(
    program: &mut Program,
    tree: &mut ScopeTree,
    global: &mut Option<String>,
) -> usize {
    if program.data.is_preserved() {
        return 0;
    }
    let targets: FxHashSet<BindingId> = tree
        .assigned_implicit_globals()
        .map(|binding| binding.id)
        .collect();
    if targets.is_empty() {
        return 0;
    }
    if global.is_none() {
        let mut scan = GlobalWrites {
            targets: &targets,
            global: None,
            routed: 0,
        };
        for stmt in program.statements.iter_mut() {
            scan.visit_statement(stmt);
        }
        if scan.routed == 0 {
            return 0;
        }
        let name = tree.mint_temporary(ScopeId::PROGRAM);
        let at = prologue_len(&program.statements);
        program.statements.insert(
            at,
            factory::expression_statement(factory::assign(factory::temp_reference(name.clone()), factory::this())),
        );
        *global = Some(name);
    }
    let mut router = GlobalWrites {
        targets: &targets,
        global: global.as_deref(),
        routed: 0,
    };
    for stmt in program.statements.iter_mut() {
        router.visit_statement(stmt);
    }
    router.routed
}

/// Counts the writes to route, rewriting them too once `global` is known.
struct GlobalWrites<'a> {
    targets: &'a FxHashSet<BindingId>,
    global: Option<&'a str>,
    routed: usize,
}

impl AstVisitorMut for GlobalWrites<'_> {
    fn visit_statement(&mut self, stmt: &mut Statement) {
        // Names under an unrewritten `with` may resolve to its object.
        if stmt.data().is_preserved() || matches!(stmt, Statement::With(_)) {
            return;
        }
        walk_mut_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        if expr.data().is_preserved() {
            return;
        }
        if let Expression::Assignment(n) = expr {
            if n.operator == AssignmentOperator::Assign {
                if let Expression::Identifier(ident) = n.target.as_ref() {
                    if ident.binding.is_some_and(|id| self.targets.contains(&id)) {
                        self.routed += 1;
                        if let Some(global) = self.global {
                            let name = ident.name.clone();
                            *n.target = factory::member(factory::temp_reference(global), name);
                        }
                    }
                }
            }
        }
        walk_mut_expression(self, expr);
    }
}

/// Warn once for each implicit global assigned from strict mode code; such
/// names are never declared.
pub(crate) fn report_strict_assignments(tree: &ScopeTree, diagnostics: &mut DiagnosticCollection) {
    for binding in tree.strict_assigned_implicit_globals() {
        let Some(span) = binding.strict_assignment else {
            continue;
        };
        diagnostics.add(Diagnostic::with_span(
            span,
            &messages::STRICT_UNDECLARED_ASSIGNMENT_LEFT_UNNORMALIZED,
            &[&binding.name_text],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{resolved, statements};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assigned_globals_are_declared_in_order() {
        let (mut program, tree) = resolved("b = 1; console.log(a); a = 2; function f() { c = b; }");
        assert_eq!(declare_implicit_globals(&mut program, &tree), 3);
        assert_eq!(
            program.statements[..3],
            statements("var b; var a; var c;")[..]
        );
    }

    #[test]
    fn test_directives_stay_first() {
        let (mut program, tree) = resolved("'use client'; x = 1;");
        declare_implicit_globals(&mut program, &tree);
        assert_eq!(program.statements, statements("'use client'; var x; x = 1;"));
    }

    #[test]
    fn test_strict_assignments_are_not_declared() {
        let (mut program, tree) = resolved("'use strict'; x = 1; function f() { y = 2; }");
        assert_eq!(declare_implicit_globals(&mut program, &tree), 0);

        let mut diagnostics = DiagnosticCollection::new();
        report_strict_assignments(&tree, &mut diagnostics);
        let codes: Vec<u32> = diagnostics.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![9007, 9007]);
    }

    #[test]
    fn test_strict_function_leaves_sloppy_globals_alone() {
        let (mut program, tree) = resolved("a = 1; function f() { 'use strict'; b = 2; }");
        assert_eq!(declare_implicit_globals(&mut program, &tree), 1);
        assert_eq!(program.statements[0], statements("var a;")[0]);
    }

    #[test]
    fn test_writes_go_through_the_global_object() {
        let (mut program, mut tree) = resolved("x = 1; function f() { x = g(); x += 1; } x;");
        let mut global = None;
        assert_eq!(route_through_global_object(&mut program, &mut tree, &mut global), 2);
        assert_eq!(global.as_deref(), Some("$tmp0"));
        assert_eq!(
            program.statements,
            statements("$tmp0 = this; $tmp0.x = 1; function f() { $tmp0.x = g(); x += 1; } x;")
        );
    }

    #[test]
    fn test_global_object_temporary_is_reused() {
        let (mut program, mut tree) = resolved("y = 2;");
        let mut global = Some("$tmp3".to_string());
        assert_eq!(route_through_global_object(&mut program, &mut tree, &mut global), 1);
        assert_eq!(program.statements, statements("$tmp3.y = 2;"));
    }

    #[test]
    fn test_with_bodies_are_not_routed() {
        let (mut program, mut tree) = resolved("with (o) { x = 1; }");
        let mut global = None;
        assert_eq!(route_through_global_object(&mut program, &mut tree, &mut global), 0);
        assert_eq!(global, None);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_read_only_globals_stay_free() {
        let (mut program, tree) = resolved("console.log(Math.max(1, 2));");
        assert_eq!(declare_implicit_globals(&mut program, &tree), 0);
        assert_eq!(program.statements.len(), 1);
    }
}
