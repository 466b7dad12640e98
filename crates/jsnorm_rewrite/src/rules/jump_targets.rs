//! Explicit labels on every `break`/`continue`.

use super::{peel_labels, peel_labels_mut, Rule};
use crate::context::RuleContext;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;

/// Gives a loop or switch a label when unlabeled jumps aim at it, and names
/// that label in each of them.
pub struct JumpTargets;

impl Rule for JumpTargets {
    fn name(&self) -> &'static str {
        "jump-targets"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        let core = peel_labels(stmt);
        if core.data().is_preserved() || !(core.is_iteration() || matches!(core, Statement::Switch(_))) {
            return None;
        }
        let existing = match stmt {
            Statement::Labeled(labeled) => Some(labeled.label.name.clone()),
            _ => None,
        };

        let mut jumps = Vec::new();
        match peel_labels_mut(stmt) {
            Statement::Switch(n) => {
                for case in &mut n.cases {
                    for s in &mut case.consequent {
                        unlabeled_jumps(s, true, false, &mut jumps);
                    }
                }
            }
            Statement::While(n) => unlabeled_jumps(&mut n.body, true, true, &mut jumps),
            Statement::DoWhile(n) => unlabeled_jumps(&mut n.body, true, true, &mut jumps),
            Statement::For(n) => unlabeled_jumps(&mut n.body, true, true, &mut jumps),
            Statement::ForIn(n) => unlabeled_jumps(&mut n.body, true, true, &mut jumps),
            Statement::ForOf(n) => unlabeled_jumps(&mut n.body, true, true, &mut jumps),
            _ => {}
        }
        if jumps.is_empty() {
            return None;
        }

        let minted = existing.is_none();
        let label = match existing {
            Some(label) => label,
            None => cx.label(),
        };
        for jump in jumps {
            jump.label = Some(factory::identifier(label.clone()));
        }
        let stmt = std::mem::take(stmt);
        Some(vec![if minted {
            factory::labeled(label, stmt)
        } else {
            stmt
        }])
    }
}

/// Collect the unlabeled jumps in `stmt` that leave through the enclosing
/// statement: `break` when `breaks`, `continue` when `continues`.
fn unlabeled_jumps<'s>(
    stmt: &'s mut Statement,
    breaks: bool,
    continues: bool,
    out: &mut Vec<&'s mut JumpStatement>,
) {
    match stmt {
        Statement::Break(jump) if breaks && jump.label.is_none() => out.push(jump),
        Statement::Continue(jump) if continues && jump.label.is_none() => out.push(jump),
        Statement::Block(n) => {
            for s in &mut n.statements {
                unlabeled_jumps(s, breaks, continues, out);
            }
        }
        Statement::If(n) => {
            unlabeled_jumps(&mut n.consequent, breaks, continues, out);
            if let Some(alternate) = &mut n.alternate {
                unlabeled_jumps(alternate, breaks, continues, out);
            }
        }
        Statement::Labeled(n) => unlabeled_jumps(&mut n.body, breaks, continues, out),
        Statement::With(n) => unlabeled_jumps(&mut n.body, breaks, continues, out),
        // A nested switch takes over `break` only.
        Statement::Switch(n) => {
            for case in &mut n.cases {
                for s in &mut case.consequent {
                    unlabeled_jumps(s, false, continues, out);
                }
            }
        }
        Statement::Try(n) => {
            for s in &mut n.block.statements {
                unlabeled_jumps(s, breaks, continues, out);
            }
            if let Some(handler) = &mut n.handler {
                for s in &mut handler.body.statements {
                    unlabeled_jumps(s, breaks, continues, out);
                }
            }
            if let Some(finalizer) = &mut n.finalizer {
                for s in &mut finalizer.statements {
                    unlabeled_jumps(s, breaks, continues, out);
                }
            }
        }
        // Nested loops and functions take over both.
        _ => {}
    }
}

/// Collect the `continue` statements in `stmt` naming one of `labels`,
/// looking through nested loops but not functions.
pub(crate) fn labeled_continues<'s>(
    stmt: &'s mut Statement,
    labels: &[String],
    out: &mut Vec<&'s mut Statement>,
) {
    let targets = matches!(
        &*stmt,
        Statement::Continue(jump) if jump.label.as_ref().is_some_and(|l| labels.contains(&l.name))
    );
    if targets {
        out.push(stmt);
        return;
    }
    match stmt {
        Statement::Block(n) => {
            for s in &mut n.statements {
                labeled_continues(s, labels, out);
            }
        }
        Statement::If(n) => {
            labeled_continues(&mut n.consequent, labels, out);
            if let Some(alternate) = &mut n.alternate {
                labeled_continues(alternate, labels, out);
            }
        }
        Statement::Labeled(n) => labeled_continues(&mut n.body, labels, out),
        Statement::With(n) => labeled_continues(&mut n.body, labels, out),
        Statement::While(n) => labeled_continues(&mut n.body, labels, out),
        Statement::DoWhile(n) => labeled_continues(&mut n.body, labels, out),
        Statement::For(n) => labeled_continues(&mut n.body, labels, out),
        Statement::ForIn(n) => labeled_continues(&mut n.body, labels, out),
        Statement::ForOf(n) => labeled_continues(&mut n.body, labels, out),
        Statement::Switch(n) => {
            for case in &mut n.cases {
                for s in &mut case.consequent {
                    labeled_continues(s, labels, out);
                }
            }
        }
        Statement::Try(n) => {
            for s in &mut n.block.statements {
                labeled_continues(s, labels, out);
            }
            if let Some(handler) = &mut n.handler {
                for s in &mut handler.body.statements {
                    labeled_continues(s, labels, out);
                }
            }
            if let Some(finalizer) = &mut n.finalizer {
                for s in &mut finalizer.statements {
                    labeled_continues(s, labels, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{resolved, statements};
    use jsnorm_ast::types::ScopeId;
    use jsnorm_diagnostics::DiagnosticCollection;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> Option<Vec<Statement>> {
        let (mut program, mut tree) = resolved(source);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        JumpTargets.rewrite_statement(&mut program.statements[0], &mut cx)
    }

    #[test]
    fn test_loop_gets_fresh_label() {
        assert_eq!(
            rewrite("while (a) { if (b) break; continue; }"),
            Some(statements(
                "$label0: while (a) { if (b) break $label0; continue $label0; }"
            ))
        );
    }

    #[test]
    fn test_existing_label_is_reused() {
        assert_eq!(
            rewrite("outer: inner: for (;;) { break; }"),
            Some(statements("outer: inner: for (;;) { break outer; }"))
        );
    }

    #[test]
    fn test_nested_targets_are_skipped() {
        // The inner loop owns its jumps; the switch owns `break` only.
        assert_eq!(
            rewrite(
                "while (a) { while (b) { break; } switch (c) { case 1: break; default: continue; } }"
            ),
            Some(statements(
                "$label0: while (a) { while (b) { break; } switch (c) { case 1: break; default: continue $label0; } }"
            ))
        );
    }

    #[test]
    fn test_switch_labels_its_breaks() {
        assert_eq!(
            rewrite("switch (x) { case 1: f(); break; }"),
            Some(statements("$label0: switch (x) { case 1: f(); break $label0; }"))
        );
    }

    #[test]
    fn test_functions_stop_the_search() {
        assert_eq!(rewrite("while (a) { function f() { while (b) break; } }"), None);
        assert_eq!(rewrite("l: while (a) { break l; }"), None);
    }

    #[test]
    fn test_labeled_continues_cross_loops() {
        let mut stmts = statements("l: while (a) { continue l; m: for (;;) { continue l; continue m; } }");
        let mut found = Vec::new();
        labeled_continues(&mut stmts[0], &["l".to_string()], &mut found);
        assert_eq!(found.len(), 2);
    }
}
