//! `for`, `for-in`, `for-of` and `do-while` as labeled `while` loops.
//!
//! Jumps aimed at the loop are already labeled when this rule runs (the
//! jump-target rule is tried first), so only labeled `continue`s need
//! care: they become a `break` out of a labeled block around the body.

use super::jump_targets::labeled_continues;
use super::{body_statements, into_statements, peel_labels, peel_labels_mut, take_labels, wrap_labels, Rule};
use crate::context::RuleContext;
use crate::query::captured_by_for_loop;
use crate::spill::assign_temporary;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::NodeFlags;
use jsnorm_ast::BinaryOperator;
use jsnorm_diagnostics::messages;

pub struct Loops;

impl Rule for Loops {
    fn name(&self) -> &'static str {
        "loops"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        let core = peel_labels(stmt);
        if core.data().is_preserved() {
            return None;
        }
        let declined = match core {
            Statement::For(n) => lexical_capture(n).map(|name| {
                (core.span(), &messages::FOR_LEXICAL_CLOSURE_LEFT_UNNORMALIZED, vec![name])
            }),
            Statement::ForIn(_) if is_key_collector(core) => return None,
            Statement::ForIn(_) if cx.tree.is_shadowed_global("Object") => Some((
                core.span(),
                &messages::GLOBAL_SHADOWED_0_LEFT_UNNORMALIZED,
                vec!["Object".to_string(), "for-in".to_string()],
            )),
            Statement::ForOf(_) if cx.tree.is_shadowed_global("Symbol") => Some((
                core.span(),
                &messages::GLOBAL_SHADOWED_0_LEFT_UNNORMALIZED,
                vec!["Symbol".to_string(), "for-of".to_string()],
            )),
            Statement::For(_) | Statement::ForIn(_) | Statement::ForOf(_) | Statement::DoWhile(_) => None,
            _ => return None,
        };
        if let Some((span, message, args)) = declined {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            cx.warn(span, message, &args);
            peel_labels_mut(stmt).data_mut().flags |= NodeFlags::PRESERVED;
            return None;
        }

        let (labels, core) = take_labels(std::mem::take(stmt));
        match core {
            Statement::For(n) => Some(for_loop(labels, n, cx)),
            Statement::DoWhile(n) => Some(vec![do_while(labels, n, cx)]),
            Statement::ForIn(n) => Some(for_in(labels, n, cx)),
            Statement::ForOf(n) => Some(for_of(labels, n, cx)),
            other => {
                *stmt = wrap_labels(labels, other);
                None
            }
        }
    }
}

/// The name of a `let`/`const` loop variable a closure in the loop refers to.
fn lexical_capture(n: &ForStatement) -> Option<String> {
    let Some(ForInit::Variable(decl)) = &n.init else {
        return None;
    };
    if !decl.kind.is_lexical() {
        return None;
    }
    let bindings: Vec<_> = decl.declarations.iter().filter_map(|d| d.name.binding).collect();
    captured_by_for_loop(n, &bindings)
}

/// The loop body with every `continue` naming one of `labels` turned into
/// a `break` out of a labeled block around the body.
fn continue_block(mut body: Statement, labels: &[Identifier], cx: &mut RuleContext<'_>) -> Vec<Statement> {
    let names: Vec<String> = labels.iter().map(|l| l.name.clone()).collect();
    let mut continues = Vec::new();
    labeled_continues(&mut body, &names, &mut continues);
    if continues.is_empty() {
        return body_statements(body);
    }
    let label = cx.label();
    for jump in continues {
        *jump = factory::break_to(label.clone());
    }
    vec![factory::labeled(label, factory::block(into_statements(body)))]
}

/// The first label, or a fresh one added to `labels`.
fn loop_label(labels: &mut Vec<Identifier>, cx: &mut RuleContext<'_>) -> String {
    if let Some(first) = labels.first() {
        return first.name.clone();
    }
    let label = cx.label();
    labels.push(factory::identifier(label.clone()));
    label
}

/// `init; while (test) { body; update; }`
fn for_loop(labels: Vec<Identifier>, n: ForStatement, cx: &mut RuleContext<'_>) -> Vec<Statement> {
    let mut body = continue_block(*n.body, &labels, cx);
    if let Some(update) = n.update {
        body.push(factory::expression_statement(update));
    }
    let test = n.test.unwrap_or_else(|| factory::boolean(true));
    let while_loop = factory::while_statement(test, body);

    let (init, lexical) = match n.init {
        Some(ForInit::Variable(decl)) => {
            let lexical = decl.kind.is_lexical();
            (Some(Statement::Variable(decl)), lexical)
        }
        Some(ForInit::Expression(expr)) => (Some(factory::expression_statement(expr)), false),
        None => (None, false),
    };
    let mut out: Vec<Statement> = init.into_iter().collect();
    out.push(while_loop);
    if labels.is_empty() && !lexical {
        return out;
    }
    vec![wrap_labels(labels, factory::block(out))]
}

/// `L: while (true) { body; if (!test) { break L; } }`
fn do_while(mut labels: Vec<Identifier>, n: DoWhileStatement, cx: &mut RuleContext<'_>) -> Statement {
    let mut body = continue_block(*n.body, &labels, cx);
    let label = loop_label(&mut labels, cx);
    body.push(factory::if_statement(
        factory::not(n.test),
        vec![factory::break_to(label)],
        None,
    ));
    wrap_labels(labels, factory::while_statement(factory::boolean(true), body))
}

/// The statement binding a loop variable to `value` at the top of each
/// iteration.
fn bind_head(head: ForHead, value: Expression) -> Statement {
    match head {
        ForHead::Variable(mut decl) => {
            if let Some(declarator) = decl.declarations.first_mut() {
                declarator.init = Some(value);
            }
            Statement::Variable(decl)
        }
        ForHead::Target(target) => factory::expression_statement(factory::assign(target, value)),
    }
}

/// A key snapshot followed by a `while` over it:
///
/// ```text
/// $o = Object(obj); $keys = [];
/// for ($k in $o) { $keys[$keys.length] = $k; }
/// $i = 0;
/// while ($i < $keys.length) {
///     $k = $keys[$i]; $i = $i + 1;
///     if ($k in $o) { lhs = $k; body }
/// }
/// ```
fn for_in(labels: Vec<Identifier>, n: ForInStatement, cx: &mut RuleContext<'_>) -> Vec<Statement> {
    let object = cx.temporary();
    let keys = cx.temporary();
    let key = cx.temporary();
    let index = cx.temporary();
    let tmp = |name: &String| factory::temp_reference(name.clone());

    let collector = factory::for_in(
        ForHead::Target(tmp(&key)),
        tmp(&object),
        vec![factory::expression_statement(factory::assign(
            factory::computed_member(tmp(&keys), factory::member(tmp(&keys), "length")),
            tmp(&key),
        ))],
    );

    let mut guarded = vec![bind_head(n.left, tmp(&key))];
    guarded.extend(continue_block(*n.body, &labels, cx));
    let body = vec![
        assign_temporary(&key, factory::computed_member(tmp(&keys), tmp(&index))),
        assign_temporary(
            &index,
            factory::binary(BinaryOperator::Add, tmp(&index), factory::number(1)),
        ),
        factory::if_statement(
            factory::binary(BinaryOperator::In, tmp(&key), tmp(&object)),
            guarded,
            None,
        ),
    ];
    let test = factory::binary(
        BinaryOperator::Lt,
        tmp(&index),
        factory::member(tmp(&keys), "length"),
    );

    vec![
        assign_temporary(&object, factory::call(factory::intrinsic("Object"), vec![n.right])),
        assign_temporary(&keys, factory::empty_array()),
        collector,
        assign_temporary(&index, factory::number(0)),
        wrap_labels(labels, factory::while_statement(test, body)),
    ]
}

/// The iterator protocol, closing the iterator on early exit:
///
/// ```text
/// $it = iterable[Symbol.iterator](); $done = true;
/// try {
///     L: while (true) {
///         $step = $it.next();
///         if ($step.done) { break L; }
///         $v = $step.value; $done = false;
///         lhs = $v; body
///         $done = true;
///     }
/// } catch ($e) {
///     if (!$done) {
///         $done = true;
///         try { if ($it.return != null) { $it.return(); } } catch ($ignored) {}
///     }
///     throw $e;
/// } finally {
///     if (!$done) { if ($it.return != null) { $it.return(); } }
/// }
/// ```
///
/// A throw out of the body closes the iterator in the handler, where
/// anything `return()` throws is dropped in favour of the body's
/// exception. `break` and `return` close it in the finalizer, where a
/// throwing `return()` propagates.
fn for_of(mut labels: Vec<Identifier>, n: ForOfStatement, cx: &mut RuleContext<'_>) -> Vec<Statement> {
    let iterator = cx.temporary();
    let done = cx.temporary();
    let step = cx.temporary();
    let value = cx.temporary();
    let thrown = cx.temporary();
    let ignored = cx.temporary();
    let tmp = |name: &String| factory::temp_reference(name.clone());

    let get_iterator = factory::call(
        factory::computed_member(n.right, factory::member(factory::intrinsic("Symbol"), "iterator")),
        Vec::new(),
    );

    let mut body = continue_block(*n.body, &labels, cx);
    let label = loop_label(&mut labels, cx);
    let mut iteration = vec![
        assign_temporary(&step, factory::call(factory::member(tmp(&iterator), "next"), Vec::new())),
        factory::if_statement(factory::member(tmp(&step), "done"), vec![factory::break_to(label)], None),
        assign_temporary(&value, factory::member(tmp(&step), "value")),
        assign_temporary(&done, factory::boolean(false)),
        bind_head(n.left, tmp(&value)),
    ];
    iteration.append(&mut body);
    iteration.push(assign_temporary(&done, factory::boolean(true)));

    let call_return = || {
        factory::if_statement(
            factory::binary(
                BinaryOperator::NotEq,
                factory::member(tmp(&iterator), "return"),
                factory::null(),
            ),
            vec![factory::expression_statement(factory::call(
                factory::member(tmp(&iterator), "return"),
                Vec::new(),
            ))],
            None,
        )
    };
    let close_on_throw = factory::if_statement(
        factory::not(tmp(&done)),
        vec![
            assign_temporary(&done, factory::boolean(true)),
            factory::try_catch(vec![call_return()], ignored, Vec::new()),
        ],
        None,
    );
    let close = factory::if_statement(factory::not(tmp(&done)), vec![call_return()], None);

    vec![
        assign_temporary(&iterator, get_iterator),
        assign_temporary(&done, factory::boolean(true)),
        factory::try_catch_finally(
            vec![wrap_labels(labels, factory::while_statement(factory::boolean(true), iteration))],
            thrown.clone(),
            vec![close_on_throw, factory::throw_statement(tmp(&thrown))],
            vec![close],
        ),
    ]
}

/// `for ($k in $o) { $keys[$keys.length] = $k; }`: the one `for-in` shape
/// the canonical subset keeps. Recognized by shape over plain identifiers,
/// so canonical output read back from text is still canonical.
pub(crate) fn is_key_collector(stmt: &Statement) -> bool {
    let Statement::ForIn(n) = stmt else {
        return false;
    };
    let ForHead::Target(Expression::Identifier(key)) = &n.left else {
        return false;
    };
    if n.right.as_identifier().is_none() {
        return false;
    }
    let Statement::Block(body) = &*n.body else {
        return false;
    };
    let [Statement::Expression(stmt)] = &body.statements[..] else {
        return false;
    };
    let Expression::Assignment(assign) = &stmt.expression else {
        return false;
    };
    if assign.operator.is_compound() || !assign.value.is_identifier_named(&key.name) {
        return false;
    }
    let Expression::Member(target) = &*assign.target else {
        return false;
    };
    let MemberProperty::Computed(index) = &target.property else {
        return false;
    };
    let Expression::Member(length) = &**index else {
        return false;
    };
    target.object.as_identifier().is_some()
        && length.object == target.object
        && matches!(&length.property, MemberProperty::Named(name) if name.name == "length")
}
