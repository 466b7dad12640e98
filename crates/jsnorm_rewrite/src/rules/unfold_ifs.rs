//! `if`/`else` with two non-empty branches as two one-branch `if`s.
//!
//! Only applied when `RewriteOptions::unfold_ifs` is set:
//!
//! ```text
//! if (test) { a } else { b }
//! ```
//!
//! becomes
//!
//! ```text
//! $t = test;
//! if ($t) { a }
//! if (!$t) { b }
//! ```
//!
//! The test is read once into a fresh temporary, which neither branch can
//! assign, so the second `if` sees the same value even when `a` falls through.

use super::{into_statements, peel_labels, take_labels, wrap_labels, Rule};
use crate::context::RuleContext;
use crate::spill::assign_temporary;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;

pub struct UnfoldIfs;

impl Rule for UnfoldIfs {
    fn name(&self) -> &'static str {
        "unfold-ifs"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        if !cx.options.unfold_ifs {
            return None;
        }
        match peel_labels(stmt) {
            Statement::If(n) if !n.data.is_preserved() && has_two_branches(n) => {}
            _ => return None,
        }
        let (labels, core) = take_labels(std::mem::take(stmt));
        let Statement::If(n) = core else {
            *stmt = wrap_labels(labels, core);
            return None;
        };
        let test = cx.temporary();
        let tmp = || factory::temp_reference(test.clone());
        let alternate = n.alternate.map(|alt| into_statements(*alt)).unwrap_or_default();
        let unfolded = vec![
            assign_temporary(&test, n.test),
            factory::if_statement(tmp(), into_statements(*n.consequent), None),
            factory::if_statement(factory::not(tmp()), alternate, None),
        ];
        if labels.is_empty() {
            Some(unfolded)
        } else {
            Some(vec![wrap_labels(labels, factory::block(unfolded))])
        }
    }
}

/// Whether both branches of an `if` do something.
pub(crate) fn has_two_branches(n: &IfStatement) -> bool {
    !is_empty_branch(&n.consequent) && n.alternate.as_deref().is_some_and(|alt| !is_empty_branch(alt))
}

fn is_empty_branch(stmt: &Statement) -> bool {
    match stmt {
        Statement::Empty(_) => true,
        Statement::Block(block) => block.statements.iter().all(is_empty_branch),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RewriteOptions;
    use crate::test_support::{resolved, statements};
    use jsnorm_ast::types::ScopeId;
    use jsnorm_diagnostics::DiagnosticCollection;
    use pretty_assertions::assert_eq;

    const UNFOLD: RewriteOptions = RewriteOptions {
        unfold_ifs: true,
        ..RewriteOptions::DEFAULT
    };

    fn rewrite(source: &str, options: &RewriteOptions) -> Option<Vec<Statement>> {
        let (mut program, mut tree) = resolved(source);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM).with_options(options);
        UnfoldIfs.rewrite_statement(&mut program.statements[0], &mut cx)
    }

    #[test]
    fn test_two_branches_are_unfolded() {
        assert_eq!(
            rewrite("if (f()) { a(); } else { b(); }", &UNFOLD),
            Some(statements("$tmp0 = f(); if ($tmp0) { a(); } if (!$tmp0) { b(); }"))
        );
    }

    #[test]
    fn test_labels_wrap_the_unfolded_pair() {
        assert_eq!(
            rewrite("l: if (x) { break l; } else { g(); }", &UNFOLD),
            Some(statements("l: { $tmp0 = x; if ($tmp0) { break l; } if (!$tmp0) { g(); } }"))
        );
    }

    #[test]
    fn test_one_branch_is_left_alone() {
        assert_eq!(rewrite("if (x) { a(); }", &UNFOLD), None);
        assert_eq!(rewrite("if (x) { a(); } else {}", &UNFOLD), None);
        assert_eq!(rewrite("if (x) ; else { b(); }", &UNFOLD), None);
    }

    #[test]
    fn test_off_by_default() {
        assert_eq!(rewrite("if (x) { a(); } else { b(); }", &RewriteOptions::default()), None);
    }
}
