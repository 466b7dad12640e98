//! AST visitor traits for traversing the syntax tree.
//!
//! `AstVisitor` walks a shared tree and `AstVisitorMut` walks a mutable one.
//! Both visit children in evaluation order. Member property names and
//! object literal keys are not references and are never visited.

use crate::node::*;

/// A visitor that traverses the AST. Default implementations walk
/// into children through the matching `walk_*` function, so an override
/// can do its own work and then call the walker to continue.
pub trait AstVisitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program)
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt)
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr)
    }

    /// Function declarations, function expressions and accessor bodies.
    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func)
    }

    fn visit_arrow_function(&mut self, arrow: &ArrowFunction) {
        walk_arrow_function(self, arrow)
    }

    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration) {
        walk_variable_declaration(self, decl)
    }

    fn visit_catch_clause(&mut self, clause: &CatchClause) {
        walk_catch_clause(self, clause)
    }

    /// A declared name: variable, parameter, function name or catch parameter.
    fn visit_binding(&mut self, _ident: &Identifier) {}

    /// An identifier in expression position.
    fn visit_reference(&mut self, _ident: &Identifier) {}

    /// A statement label, at its definition or in a `break`/`continue`.
    fn visit_label(&mut self, _label: &Identifier) {}
}

pub fn walk_program<V: AstVisitor + ?Sized>(v: &mut V, program: &Program) {
    for stmt in program.statements.iter() {
        v.visit_statement(stmt);
    }
}

pub fn walk_statement<V: AstVisitor + ?Sized>(v: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Variable(decl) => v.visit_variable_declaration(decl),
        Statement::Function(func) => v.visit_function(func),
        Statement::Block(block) => {
            for s in block.statements.iter() {
                v.visit_statement(s);
            }
        }
        Statement::Empty(_) | Statement::Debugger(_) => {}
        Statement::Expression(n) => v.visit_expression(&n.expression),
        Statement::If(n) => {
            v.visit_expression(&n.test);
            v.visit_statement(&n.consequent);
            if let Some(alt) = &n.alternate {
                v.visit_statement(alt);
            }
        }
        Statement::While(n) => {
            v.visit_expression(&n.test);
            v.visit_statement(&n.body);
        }
        Statement::DoWhile(n) => {
            v.visit_statement(&n.body);
            v.visit_expression(&n.test);
        }
        Statement::For(n) => {
            match &n.init {
                Some(ForInit::Variable(decl)) => v.visit_variable_declaration(decl),
                Some(ForInit::Expression(e)) => v.visit_expression(e),
                None => {}
            }
            if let Some(test) = &n.test {
                v.visit_expression(test);
            }
            if let Some(update) = &n.update {
                v.visit_expression(update);
            }
            v.visit_statement(&n.body);
        }
        Statement::ForIn(n) => {
            walk_for_head(v, &n.left);
            v.visit_expression(&n.right);
            v.visit_statement(&n.body);
        }
        Statement::ForOf(n) => {
            walk_for_head(v, &n.left);
            v.visit_expression(&n.right);
            v.visit_statement(&n.body);
        }
        Statement::Continue(n) | Statement::Break(n) => {
            if let Some(label) = &n.label {
                v.visit_label(label);
            }
        }
        Statement::Return(n) => {
            if let Some(arg) = &n.argument {
                v.visit_expression(arg);
            }
        }
        Statement::With(n) => {
            v.visit_expression(&n.object);
            v.visit_statement(&n.body);
        }
        Statement::Switch(n) => {
            v.visit_expression(&n.discriminant);
            for case in n.cases.iter() {
                if let Some(test) = &case.test {
                    v.visit_expression(test);
                }
                for s in case.consequent.iter() {
                    v.visit_statement(s);
                }
            }
        }
        Statement::Labeled(n) => {
            v.visit_label(&n.label);
            v.visit_statement(&n.body);
        }
        Statement::Throw(n) => v.visit_expression(&n.argument),
        Statement::Try(n) => {
            for s in n.block.statements.iter() {
                v.visit_statement(s);
            }
            if let Some(handler) = &n.handler {
                v.visit_catch_clause(handler);
            }
            if let Some(finalizer) = &n.finalizer {
                for s in finalizer.statements.iter() {
                    v.visit_statement(s);
                }
            }
        }
    }
}

fn walk_for_head<V: AstVisitor + ?Sized>(v: &mut V, head: &ForHead) {
    match head {
        ForHead::Variable(decl) => v.visit_variable_declaration(decl),
        ForHead::Target(target) => v.visit_expression(target),
    }
}

pub fn walk_variable_declaration<V: AstVisitor + ?Sized>(
    v: &mut V,
    decl: &VariableDeclaration,
) {
    for d in decl.declarations.iter() {
        v.visit_binding(&d.name);
        if let Some(init) = &d.init {
            v.visit_expression(init);
        }
    }
}

pub fn walk_catch_clause<V: AstVisitor + ?Sized>(v: &mut V, clause: &CatchClause) {
    v.visit_binding(&clause.param);
    for s in clause.body.statements.iter() {
        v.visit_statement(s);
    }
}

pub fn walk_function<V: AstVisitor + ?Sized>(v: &mut V, func: &Function) {
    if let Some(name) = &func.name {
        v.visit_binding(name);
    }
    for param in func.params.iter() {
        v.visit_binding(param);
    }
    for s in func.body.statements.iter() {
        v.visit_statement(s);
    }
}

pub fn walk_arrow_function<V: AstVisitor + ?Sized>(v: &mut V, arrow: &ArrowFunction) {
    for param in arrow.params.iter() {
        v.visit_binding(param);
    }
    match &arrow.body {
        ArrowBody::Expression(e) => v.visit_expression(e),
        ArrowBody::Block(body) => {
            for s in body.statements.iter() {
                v.visit_statement(s);
            }
        }
    }
}

pub fn walk_expression<V: AstVisitor + ?Sized>(v: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier(ident) => v.visit_reference(ident),
        Expression::This(_)
        | Expression::Null(_)
        | Expression::Boolean(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::RegExp(_) => {}
        Expression::Array(n) => {
            for e in n.elements.iter().flatten() {
                v.visit_expression(e);
            }
        }
        Expression::Object(n) => {
            for prop in n.properties.iter() {
                match &prop.value {
                    PropertyValue::Init(e) => v.visit_expression(e),
                    PropertyValue::Get(f) | PropertyValue::Set(f) => v.visit_function(f),
                }
            }
        }
        Expression::Function(f) => v.visit_function(f),
        Expression::Arrow(a) => v.visit_arrow_function(a),
        Expression::Unary(n) => v.visit_expression(&n.operand),
        Expression::Update(n) => v.visit_expression(&n.operand),
        Expression::Binary(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::Logical(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::Assignment(n) => {
            v.visit_expression(&n.target);
            v.visit_expression(&n.value);
        }
        Expression::Conditional(n) => {
            v.visit_expression(&n.test);
            v.visit_expression(&n.consequent);
            v.visit_expression(&n.alternate);
        }
        Expression::Call(n) => {
            v.visit_expression(&n.callee);
            for arg in n.arguments.iter() {
                v.visit_expression(arg);
            }
        }
        Expression::New(n) => {
            v.visit_expression(&n.callee);
            for arg in n.arguments.iter() {
                v.visit_expression(arg);
            }
        }
        Expression::Member(n) => {
            v.visit_expression(&n.object);
            if let MemberProperty::Computed(key) = &n.property {
                v.visit_expression(key);
            }
        }
        Expression::Sequence(n) => {
            for e in n.expressions.iter() {
                v.visit_expression(e);
            }
        }
    }
}

// ============================================================================
// Mutable visitor
// ============================================================================

/// A visitor that traverses the AST mutably. Default implementations walk
/// into children through the matching `walk_mut_*` function, so an override
/// can do its own work and then call the walker to continue.
pub trait AstVisitorMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_mut_program(self, program)
    }

    fn visit_statement(&mut self, stmt: &mut Statement) {
        walk_mut_statement(self, stmt)
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        walk_mut_expression(self, expr)
    }

    /// Function declarations, function expressions and accessor bodies.
    fn visit_function(&mut self, func: &mut Function) {
        walk_mut_function(self, func)
    }

    fn visit_arrow_function(&mut self, arrow: &mut ArrowFunction) {
        walk_mut_arrow_function(self, arrow)
    }

    fn visit_variable_declaration(&mut self, decl: &mut VariableDeclaration) {
        walk_mut_variable_declaration(self, decl)
    }

    fn visit_catch_clause(&mut self, clause: &mut CatchClause) {
        walk_mut_catch_clause(self, clause)
    }

    /// A declared name: variable, parameter, function name or catch parameter.
    fn visit_binding(&mut self, _ident: &mut Identifier) {}

    /// An identifier in expression position.
    fn visit_reference(&mut self, _ident: &mut Identifier) {}

    /// A statement label, at its definition or in a `break`/`continue`.
    fn visit_label(&mut self, _label: &mut Identifier) {}
}

pub fn walk_mut_program<V: AstVisitorMut + ?Sized>(v: &mut V, program: &mut Program) {
    for stmt in program.statements.iter_mut() {
        v.visit_statement(stmt);
    }
}

pub fn walk_mut_statement<V: AstVisitorMut + ?Sized>(v: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Variable(decl) => v.visit_variable_declaration(decl),
        Statement::Function(func) => v.visit_function(func),
        Statement::Block(block) => {
            for s in block.statements.iter_mut() {
                v.visit_statement(s);
            }
        }
        Statement::Empty(_) | Statement::Debugger(_) => {}
        Statement::Expression(n) => v.visit_expression(&mut n.expression),
        Statement::If(n) => {
            v.visit_expression(&mut n.test);
            v.visit_statement(&mut n.consequent);
            if let Some(alt) = &mut n.alternate {
                v.visit_statement(alt);
            }
        }
        Statement::While(n) => {
            v.visit_expression(&mut n.test);
            v.visit_statement(&mut n.body);
        }
        Statement::DoWhile(n) => {
            v.visit_statement(&mut n.body);
            v.visit_expression(&mut n.test);
        }
        Statement::For(n) => {
            match &mut n.init {
                Some(ForInit::Variable(decl)) => v.visit_variable_declaration(decl),
                Some(ForInit::Expression(e)) => v.visit_expression(e),
                None => {}
            }
            if let Some(test) = &mut n.test {
                v.visit_expression(test);
            }
            if let Some(update) = &mut n.update {
                v.visit_expression(update);
            }
            v.visit_statement(&mut n.body);
        }
        Statement::ForIn(n) => {
            walk_mut_for_head(v, &mut n.left);
            v.visit_expression(&mut n.right);
            v.visit_statement(&mut n.body);
        }
        Statement::ForOf(n) => {
            walk_mut_for_head(v, &mut n.left);
            v.visit_expression(&mut n.right);
            v.visit_statement(&mut n.body);
        }
        Statement::Continue(n) | Statement::Break(n) => {
            if let Some(label) = &mut n.label {
                v.visit_label(label);
            }
        }
        Statement::Return(n) => {
            if let Some(arg) = &mut n.argument {
                v.visit_expression(arg);
            }
        }
        Statement::With(n) => {
            v.visit_expression(&mut n.object);
            v.visit_statement(&mut n.body);
        }
        Statement::Switch(n) => {
            v.visit_expression(&mut n.discriminant);
            for case in n.cases.iter_mut() {
                if let Some(test) = &mut case.test {
                    v.visit_expression(test);
                }
                for s in case.consequent.iter_mut() {
                    v.visit_statement(s);
                }
            }
        }
        Statement::Labeled(n) => {
            v.visit_label(&mut n.label);
            v.visit_statement(&mut n.body);
        }
        Statement::Throw(n) => v.visit_expression(&mut n.argument),
        Statement::Try(n) => {
            for s in n.block.statements.iter_mut() {
                v.visit_statement(s);
            }
            if let Some(handler) = &mut n.handler {
                v.visit_catch_clause(handler);
            }
            if let Some(finalizer) = &mut n.finalizer {
                for s in finalizer.statements.iter_mut() {
                    v.visit_statement(s);
                }
            }
        }
    }
}

fn walk_mut_for_head<V: AstVisitorMut + ?Sized>(v: &mut V, head: &mut ForHead) {
    match head {
        ForHead::Variable(decl) => v.visit_variable_declaration(decl),
        ForHead::Target(target) => v.visit_expression(target),
    }
}

pub fn walk_mut_variable_declaration<V: AstVisitorMut + ?Sized>(
    v: &mut V,
    decl: &mut VariableDeclaration,
) {
    for d in decl.declarations.iter_mut() {
        v.visit_binding(&mut d.name);
        if let Some(init) = &mut d.init {
            v.visit_expression(init);
        }
    }
}

pub fn walk_mut_catch_clause<V: AstVisitorMut + ?Sized>(v: &mut V, clause: &mut CatchClause) {
    v.visit_binding(&mut clause.param);
    for s in clause.body.statements.iter_mut() {
        v.visit_statement(s);
    }
}

pub fn walk_mut_function<V: AstVisitorMut + ?Sized>(v: &mut V, func: &mut Function) {
    if let Some(name) = &mut func.name {
        v.visit_binding(name);
    }
    for param in func.params.iter_mut() {
        v.visit_binding(param);
    }
    for s in func.body.statements.iter_mut() {
        v.visit_statement(s);
    }
}

pub fn walk_mut_arrow_function<V: AstVisitorMut + ?Sized>(v: &mut V, arrow: &mut ArrowFunction) {
    for param in arrow.params.iter_mut() {
        v.visit_binding(param);
    }
    match &mut arrow.body {
        ArrowBody::Expression(e) => v.visit_expression(e),
        ArrowBody::Block(body) => {
            for s in body.statements.iter_mut() {
                v.visit_statement(s);
            }
        }
    }
}

pub fn walk_mut_expression<V: AstVisitorMut + ?Sized>(v: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Identifier(ident) => v.visit_reference(ident),
        Expression::This(_)
        | Expression::Null(_)
        | Expression::Boolean(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::RegExp(_) => {}
        Expression::Array(n) => {
            for e in n.elements.iter_mut().flatten() {
                v.visit_expression(e);
            }
        }
        Expression::Object(n) => {
            for prop in n.properties.iter_mut() {
                match &mut prop.value {
                    PropertyValue::Init(e) => v.visit_expression(e),
                    PropertyValue::Get(f) | PropertyValue::Set(f) => v.visit_function(f),
                }
            }
        }
        Expression::Function(f) => v.visit_function(f),
        Expression::Arrow(a) => v.visit_arrow_function(a),
        Expression::Unary(n) => v.visit_expression(&mut n.operand),
        Expression::Update(n) => v.visit_expression(&mut n.operand),
        Expression::Binary(n) => {
            v.visit_expression(&mut n.left);
            v.visit_expression(&mut n.right);
        }
        Expression::Logical(n) => {
            v.visit_expression(&mut n.left);
            v.visit_expression(&mut n.right);
        }
        Expression::Assignment(n) => {
            v.visit_expression(&mut n.target);
            v.visit_expression(&mut n.value);
        }
        Expression::Conditional(n) => {
            v.visit_expression(&mut n.test);
            v.visit_expression(&mut n.consequent);
            v.visit_expression(&mut n.alternate);
        }
        Expression::Call(n) => {
            v.visit_expression(&mut n.callee);
            for arg in n.arguments.iter_mut() {
                v.visit_expression(arg);
            }
        }
        Expression::New(n) => {
            v.visit_expression(&mut n.callee);
            for arg in n.arguments.iter_mut() {
                v.visit_expression(arg);
            }
        }
        Expression::Member(n) => {
            v.visit_expression(&mut n.object);
            if let MemberProperty::Computed(key) = &mut n.property {
                v.visit_expression(key);
            }
        }
        Expression::Sequence(n) => {
            for e in n.expressions.iter_mut() {
                v.visit_expression(e);
            }
        }
    }
}
