//! The rewrite rules.
//!
//! Statement and expression rules are tried at every node in the order of
//! [`RULES`]; the first that applies wins and the engine moves past the
//! replacement. Body-level rules (`implicit_globals`, `explicit_return`,
//! `unify_returns`) are run by the engine when it enters a body.

mod arrow_body;
mod compound_assignment;
pub(crate) mod explicit_return;
pub(crate) mod implicit_globals;
mod jump_targets;
pub(crate) mod loops;
mod short_circuit;
pub(crate) mod unfold_ifs;
pub(crate) mod unify_returns;
mod var_split;
mod with_statement;

use crate::context::RuleContext;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;

pub use arrow_body::ArrowBodyRule;
pub use compound_assignment::CompoundAssignment;
pub use jump_targets::JumpTargets;
pub use loops::Loops;
pub use short_circuit::ShortCircuit;
pub use unfold_ifs::UnfoldIfs;
pub use var_split::VarSplit;
pub use with_statement::WithStatementRule;

/// A local rewrite toward the canonical subset.
///
/// A rule that cannot rewrite a construct safely leaves it in place; it may
/// mark the node `PRESERVED` and report a warning through the context so
/// that no later sweep tries again.
pub trait Rule: Sync {
    fn name(&self) -> &'static str;

    /// Replace `stmt` (including any labels around it) with a list of
    /// statements. `None` means the rule does not apply.
    fn rewrite_statement(
        &self,
        _stmt: &mut Statement,
        _cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        None
    }

    /// Rewrite `expr` in place. `value_used` is false when the result is
    /// discarded (expression statements, non-final comma operands).
    fn rewrite_expression(
        &self,
        _expr: &mut Expression,
        _value_used: bool,
        _cx: &mut RuleContext<'_>,
    ) -> bool {
        false
    }
}

/// Every node-level rule, in application order.
pub static RULES: [&dyn Rule; 8] = [
    &WithStatementRule,
    &JumpTargets,
    &Loops,
    &VarSplit,
    &ArrowBodyRule,
    &CompoundAssignment,
    &ShortCircuit,
    &UnfoldIfs,
];

// ============================================================================
// Label helpers
// ============================================================================

/// The statement under any number of labels.
pub(crate) fn peel_labels(stmt: &Statement) -> &Statement {
    let mut current = stmt;
    while let Statement::Labeled(labeled) = current {
        current = &labeled.body;
    }
    current
}

pub(crate) fn peel_labels_mut(stmt: &mut Statement) -> &mut Statement {
    match stmt {
        Statement::Labeled(labeled) => peel_labels_mut(&mut labeled.body),
        other => other,
    }
}

/// Names of the labels directly wrapping a statement, outermost first.
pub(crate) fn label_names(stmt: &Statement) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = stmt;
    while let Statement::Labeled(labeled) = current {
        names.push(labeled.label.name.clone());
        current = &labeled.body;
    }
    names
}

/// Split a statement into its labels (outermost first) and its core.
pub(crate) fn take_labels(stmt: Statement) -> (Vec<Identifier>, Statement) {
    let mut labels = Vec::new();
    let mut current = stmt;
    while let Statement::Labeled(labeled) = current {
        labels.push(labeled.label);
        current = *labeled.body;
    }
    (labels, current)
}

/// Re-apply labels taken with [`take_labels`].
pub(crate) fn wrap_labels(labels: Vec<Identifier>, stmt: Statement) -> Statement {
    labels.into_iter().rev().fold(stmt, |body, label| {
        Statement::Labeled(LabeledStatement {
            data: NodeData::default(),
            label,
            body: Box::new(body),
        })
    })
}

/// The statements of a loop or `with` body, unwrapping a block.
pub(crate) fn into_statements(stmt: Statement) -> Vec<Statement> {
    match stmt {
        Statement::Block(block) => block.statements,
        Statement::Empty(_) => Vec::new(),
        other => vec![other],
    }
}

/// A body spliced into a new statement list keeps its own block when it
/// declares block-scoped names.
pub(crate) fn body_statements(body: Statement) -> Vec<Statement> {
    match body {
        Statement::Block(block) if block.statements.iter().any(declares_block_scoped) => {
            vec![Statement::Block(block)]
        }
        other => into_statements(other),
    }
}

fn declares_block_scoped(stmt: &Statement) -> bool {
    match stmt {
        Statement::Variable(decl) => decl.kind.is_lexical(),
        Statement::Function(_) => true,
        _ => false,
    }
}

/// Wrap a list of statements as one, without a block when it is a single
/// statement that stands alone. Declarations need the block, and so does an
/// `if`, which could otherwise capture an enclosing `else`.
pub(crate) fn as_single_statement(mut statements: Vec<Statement>) -> Statement {
    let stands_alone = |stmt: &Statement| {
        !matches!(
            peel_labels(stmt),
            Statement::Variable(_) | Statement::Function(_) | Statement::If(_)
        )
    };
    if statements.len() == 1 && stands_alone(&statements[0]) {
        if let Some(only) = statements.pop() {
            return only;
        }
    }
    factory::block(statements)
}
