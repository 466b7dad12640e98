//! `with (obj) body` as explicit lookups on a temporary holding `obj`.

use super::{body_statements, peel_labels, take_labels, wrap_labels, Rule};
use crate::context::RuleContext;
use crate::query::contains_function;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::{BindingId, NodeFlags};
use jsnorm_ast::visitor::{walk_mut_expression, walk_mut_statement, walk_statement};
use jsnorm_ast::{AstVisitor, AstVisitorMut, BinaryOperator, UnaryOperator};
use jsnorm_core::collections::FxHashSet;
use jsnorm_diagnostics::messages;
use jsnorm_resolver::{BindingKind, ScopeTree};

pub struct WithStatementRule;

impl Rule for WithStatementRule {
    fn name(&self) -> &'static str {
        "with-statement"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        let Statement::With(with) = peel_labels(stmt) else {
            return None;
        };
        if with.data.is_preserved() {
            return None;
        }
        let mut scan = BodyScan::default();
        scan.visit_statement(&with.body);
        if scan.nested_with {
            // Inner statements are rewritten first.
            return None;
        }

        let declined = if contains_function(&with.body) {
            Some((&messages::WITH_NESTED_FUNCTION_LEFT_UNNORMALIZED, Vec::new()))
        } else if let Some(name) = scan.assigned_by_loop(cx.tree) {
            Some((&messages::WITH_LOOP_TARGET_LEFT_UNNORMALIZED, vec![name]))
        } else {
            ["Object", "TypeError"]
                .into_iter()
                .find(|name| cx.tree.is_shadowed_global(name))
                .map(|name| {
                    (
                        &messages::GLOBAL_SHADOWED_0_LEFT_UNNORMALIZED,
                        vec![name.to_string(), "with".to_string()],
                    )
                })
        };
        if let Some((message, args)) = declined {
            let span = with.data.span;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            cx.warn(span, message, &args);
            if let Statement::With(with) = super::peel_labels_mut(stmt) {
                with.data.flags |= NodeFlags::PRESERVED;
            }
            return None;
        }
        let locals = scan.locals(cx.tree);

        let (labels, core) = take_labels(std::mem::take(stmt));
        let Statement::With(with) = core else {
            return None;
        };
        let object = cx.temporary();
        let mut body = *with.body;

        let mut hoist = VarHoister::default();
        hoist.visit_statement(&mut body);
        FreeNames {
            object: &object,
            locals: &locals,
            tree: cx.tree,
        }
        .visit_statement(&mut body);

        let mut out = vec![
            assign(&object, with.object),
            factory::if_statement(
                factory::binary(BinaryOperator::Eq, temp(&object), factory::null()),
                vec![factory::throw_statement(factory::new_expression(
                    factory::intrinsic("TypeError"),
                    vec![factory::string("Cannot convert undefined or null to object")],
                ))],
                None,
            ),
            assign(&object, factory::call(factory::intrinsic("Object"), vec![temp(&object)])),
        ];
        out.extend(hoist.names.into_iter().map(|name| {
            factory::declaration(VariableKind::Var, name, None)
        }));
        out.extend(body_statements(body));

        if labels.is_empty() {
            Some(out)
        } else {
            Some(vec![wrap_labels(labels, factory::block(out))])
        }
    }
}

fn temp(name: &str) -> Expression {
    factory::temp_reference(name)
}

fn assign(name: &str, value: Expression) -> Statement {
    factory::expression_statement(factory::assign(temp(name), value))
}

// ============================================================================
// Body analysis
// ============================================================================

/// What the rule must know about a `with` body before touching it.
#[derive(Default)]
struct BodyScan {
    nested_with: bool,
    /// Declared names, to pick out block-scoped locals.
    declared: Vec<BindingId>,
    /// Identifier targets of `for-in`/`for-of` heads, and `var` heads.
    loop_targets: Vec<(String, Option<BindingId>, bool)>,
}

impl BodyScan {
    /// Bindings declared by `let`, `const` or `catch` inside the body.
    fn locals(&self, tree: &ScopeTree) -> FxHashSet<BindingId> {
        self.declared
            .iter()
            .copied()
            .filter(|&id| {
                tree.binding(id).is_some_and(|b| {
                    matches!(
                        b.kind,
                        BindingKind::Let | BindingKind::Const | BindingKind::CatchParameter
                    )
                })
            })
            .collect()
    }

    /// A loop head that would assign through the object on every
    /// iteration: a free identifier or a `var`.
    fn assigned_by_loop(&self, tree: &ScopeTree) -> Option<String> {
        let locals = self.locals(tree);
        self.loop_targets
            .iter()
            .find(|(_, binding, is_var)| *is_var || !binding.is_some_and(|id| locals.contains(&id)))
            .map(|(name, _, _)| name.clone())
    }
}

impl AstVisitor for BodyScan {
    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::With(_) => self.nested_with = true,
            Statement::ForIn(ForInStatement { left, .. }) | Statement::ForOf(ForOfStatement { left, .. }) => {
                match left {
                    ForHead::Target(Expression::Identifier(ident)) => {
                        self.loop_targets.push((ident.name.clone(), ident.binding, false));
                    }
                    ForHead::Variable(decl) if decl.kind == VariableKind::Var => {
                        for d in &decl.declarations {
                            self.loop_targets.push((d.name.name.clone(), d.name.binding, true));
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        walk_statement(self, stmt);
    }

    fn visit_binding(&mut self, ident: &Identifier) {
        if let Some(id) = ident.binding {
            self.declared.push(id);
        }
    }
}

// ============================================================================
// Body rewriting
// ============================================================================

/// Turns every `var` in the body into plain assignments; the names are
/// declared again ahead of the body. An initializer must assign through
/// the object when it has the name.
#[derive(Default)]
struct VarHoister {
    names: Vec<Identifier>,
}

impl VarHoister {
    fn assignments(&mut self, declarations: Vec<VariableDeclarator>) -> Option<Expression> {
        let mut assignments = Vec::new();
        for declarator in declarations {
            if let Some(init) = declarator.init {
                let target = Expression::Identifier(declarator.name.clone());
                assignments.push(factory::assign(target, init));
            }
            self.names.push(declarator.name);
        }
        (!assignments.is_empty()).then(|| factory::sequence(assignments))
    }
}

impl AstVisitorMut for VarHoister {
    fn visit_statement(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::Variable(decl) if decl.kind == VariableKind::Var => {
                let declarations = std::mem::take(&mut decl.declarations);
                *stmt = match self.assignments(declarations) {
                    Some(expr) => factory::expression_statement(expr),
                    None => Statement::Empty(NodeData::default()),
                };
                return;
            }
            Statement::For(n) => {
                if let Some(ForInit::Variable(decl)) = &n.init {
                    if decl.kind == VariableKind::Var {
                        let Some(ForInit::Variable(decl)) = n.init.take() else {
                            return;
                        };
                        n.init = self.assignments(decl.declarations).map(ForInit::Expression);
                    }
                }
            }
            _ => {}
        }
        walk_mut_statement(self, stmt);
        if let Statement::Block(block) = stmt {
            block.statements.retain(|s| !matches!(s, Statement::Empty(_)));
        }
    }
}

/// Rewrites each free name `x` to consult the object first:
/// `"x" in $w ? $w.x : x`.
struct FreeNames<'a> {
    object: &'a str,
    locals: &'a FxHashSet<BindingId>,
    tree: &'a ScopeTree,
}

impl FreeNames<'_> {
    fn is_free(&self, ident: &Identifier) -> bool {
        if ident.data.flags.intersects(NodeFlags::SYNTHESIZED | NodeFlags::INTRINSIC) {
            return false;
        }
        match ident.binding {
            Some(id) => {
                !self.locals.contains(&id)
                    && self
                        .tree
                        .binding(id)
                        .map_or(true, |b| b.kind != BindingKind::Temporary)
            }
            None => true,
        }
    }

    fn free_name<'e>(&self, expr: &'e Expression) -> Option<&'e str> {
        match expr {
            Expression::Identifier(ident) if self.is_free(ident) => Some(ident.name.as_str()),
            _ => None,
        }
    }

    /// `"x" in $w ? on_object($w.x) : on_name(x)`
    fn choose(
        &self,
        name: &str,
        original: Expression,
        rebuild: impl Fn(Expression) -> Expression,
    ) -> Expression {
        let on_object = factory::member(temp(self.object), name);
        factory::conditional(
            factory::binary(BinaryOperator::In, factory::string(name), temp(self.object)),
            rebuild(on_object),
            rebuild(original),
        )
    }
}

impl AstVisitorMut for FreeNames<'_> {
    fn visit_expression(&mut self, expr: &mut Expression) {
        let rewritten = match expr {
            Expression::Identifier(ident) if self.is_free(ident) => {
                let name = ident.name.clone();
                let original = std::mem::take(expr);
                self.choose(&name, original, |e| e)
            }
            Expression::Unary(n)
                if matches!(n.operator, UnaryOperator::TypeOf | UnaryOperator::Delete) =>
            {
                let Some(name) = self.free_name(&n.operand).map(str::to_string) else {
                    return walk_mut_expression(self, expr);
                };
                let operator = n.operator;
                let original = std::mem::take(&mut *n.operand);
                self.choose(&name, original, |e| factory::unary(operator, e))
            }
            Expression::Call(n) => {
                let Some(name) = self.free_name(&n.callee).map(str::to_string) else {
                    return walk_mut_expression(self, expr);
                };
                for arg in &mut n.arguments {
                    self.visit_expression(arg);
                }
                let arguments = std::mem::take(&mut n.arguments);
                let original = std::mem::take(&mut *n.callee);
                self.choose(&name, original, |callee| factory::call(callee, arguments.clone()))
            }
            Expression::Assignment(n) => {
                let Some(name) = self.free_name(&n.target).map(str::to_string) else {
                    return walk_mut_expression(self, expr);
                };
                self.visit_expression(&mut n.value);
                let operator = n.operator;
                let value = std::mem::take(&mut *n.value);
                let original = std::mem::take(&mut *n.target);
                self.choose(&name, original, |target| {
                    Expression::Assignment(AssignmentExpression {
                        data: NodeData::default(),
                        operator,
                        target: Box::new(target),
                        value: Box::new(value.clone()),
                    })
                })
            }
            Expression::Update(n) => {
                let Some(name) = self.free_name(&n.operand).map(str::to_string) else {
                    return walk_mut_expression(self, expr);
                };
                let (operator, prefix) = (n.operator, n.prefix);
                let original = std::mem::take(&mut *n.operand);
                self.choose(&name, original, |operand| {
                    Expression::Update(UpdateExpression {
                        data: NodeData::default(),
                        operator,
                        prefix,
                        operand: Box::new(operand),
                    })
                })
            }
            _ => return walk_mut_expression(self, expr),
        };
        *expr = rewritten;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{resolved, statements};
    use jsnorm_ast::types::ScopeId;
    use jsnorm_diagnostics::DiagnosticCollection;
    use pretty_assertions::assert_eq;

    const PROLOGUE: &str = r#"$tmp0 = o;
        if ($tmp0 == null) { throw new TypeError("Cannot convert undefined or null to object"); }
        $tmp0 = Object($tmp0);"#;

    fn rewrite(source: &str) -> (Option<Vec<Statement>>, DiagnosticCollection) {
        let (mut program, mut tree) = resolved(source);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        let out = WithStatementRule.rewrite_statement(&mut program.statements[0], &mut cx);
        (out, diagnostics)
    }

    fn expected(body: &str) -> Option<Vec<Statement>> {
        Some(statements(&format!("{PROLOGUE}\n{body}")))
    }

    #[test]
    fn test_reads_and_calls() {
        assert_eq!(
            rewrite("with (o) { f(x); }").0,
            expected(r#"("f" in $tmp0 ? $tmp0.f(("x" in $tmp0 ? $tmp0.x : x)) : f(("x" in $tmp0 ? $tmp0.x : x)));"#)
        );
    }

    #[test]
    fn test_assignment_and_update() {
        assert_eq!(
            rewrite("with (o) { x += 1; y++; }").0,
            expected(r#""x" in $tmp0 ? $tmp0.x += 1 : x += 1; "y" in $tmp0 ? $tmp0.y++ : y++;"#)
        );
    }

    #[test]
    fn test_typeof_and_delete() {
        assert_eq!(
            rewrite("with (o) { t = typeof x; delete y; }").0,
            expected(
                r#""t" in $tmp0 ? $tmp0.t = ("x" in $tmp0 ? typeof $tmp0.x : typeof x) : t = ("x" in $tmp0 ? typeof $tmp0.x : typeof x);
                   "y" in $tmp0 ? delete $tmp0.y : delete y;"#
            )
        );
    }

    #[test]
    fn test_var_initializer_assigns_through_object() {
        assert_eq!(
            rewrite("with (o) { var a = 1, b; }").0,
            expected(r#"var a; var b; "a" in $tmp0 ? $tmp0.a = 1 : a = 1;"#)
        );
    }

    #[test]
    fn test_block_scoped_names_are_local() {
        assert_eq!(
            rewrite("with (o) { let v = 1; g(v); }").0,
            expected(r#"{ let v = 1; "g" in $tmp0 ? $tmp0.g(v) : g(v); }"#)
        );
    }

    #[test]
    fn test_nested_function_is_preserved() {
        let (mut program, mut tree) = resolved("with (o) { h = function () { return x; }; }");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        assert!(WithStatementRule.rewrite_statement(&mut program.statements[0], &mut cx).is_none());
        assert!(program.statements[0].data().is_preserved());
        assert_eq!(diagnostics.diagnostics()[0].code, 9002);
    }

    #[test]
    fn test_loop_target_declines() {
        let (out, diagnostics) = rewrite("with (o) { for (k in o) f(k); }");
        assert!(out.is_none());
        assert_eq!(diagnostics.diagnostics()[0].code, 9003);
        assert!(diagnostics.diagnostics()[0].message_text.contains("'k'"));

        let (out, _) = rewrite("with (o) { for (let k in o) f(k); }");
        assert!(out.is_some());
    }

    #[test]
    fn test_inner_with_goes_first() {
        let (out, diagnostics) = rewrite("with (o) { with (p) { x; } }");
        assert!(out.is_none());
        assert!(diagnostics.is_empty());
    }
}
