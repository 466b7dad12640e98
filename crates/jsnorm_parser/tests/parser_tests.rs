//! Parser integration tests.
//!
//! Verifies that the parser builds the expected AST shapes for the accepted
//! grammar and rejects everything else with a located error.

use jsnorm_ast::node::*;
use jsnorm_ast::operators::{AssignmentOperator, BinaryOperator, UnaryOperator};
use jsnorm_parser::{parse, ParseError};
use pretty_assertions::assert_eq;

/// Helper: parse source text that must be accepted.
fn parse_ok(source: &str) -> Program {
    match parse(source) {
        Ok(program) => program,
        Err(error) => panic!("unexpected parse error for {:?}: {}", source, error),
    }
}

/// Helper: parse source text that must be rejected.
fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(_) => panic!("expected a parse error for {:?}", source),
        Err(error) => error,
    }
}

/// Helper: assert that parsing produces the expected number of top-level statements.
fn assert_statement_count(source: &str, expected: usize) {
    assert_eq!(parse_ok(source).statements.len(), expected, "source: {}", source);
}

/// Helper: the expression of a single expression statement.
fn expression_of(source: &str) -> Expression {
    let mut program = parse_ok(source);
    match program.statements.remove(0) {
        Statement::Expression(statement) => statement.expression,
        other => panic!("expected an expression statement, got {}", other.describe()),
    }
}

fn assert_error_code(source: &str, code: u32) {
    let error = parse_err(source);
    assert_eq!(error.code, code, "source: {} error: {}", source, error);
}

// ============================================================================
// Variable Declarations
// ============================================================================

#[test]
fn test_parse_var_declaration() {
    let program = parse_ok("var z = true;");
    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected a variable statement");
    };
    assert_eq!(declaration.kind, VariableKind::Var);
    assert_eq!(declaration.declarations[0].name.name, "z");
}

#[test]
fn test_parse_multiple_declarators() {
    let program = parse_ok("let a = 1, b, c = a;");
    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected a variable statement");
    };
    assert_eq!(declaration.kind, VariableKind::Let);
    assert_eq!(declaration.declarations.len(), 3);
    assert!(declaration.declarations[1].init.is_none());
}

#[test]
fn test_parse_multiple_statements() {
    assert_statement_count("const a = 1; let b = 2; var c = 3;", 3);
}

#[test]
fn test_let_as_identifier() {
    let expression = expression_of("let = 5;");
    let Expression::Assignment(assignment) = expression else {
        panic!("expected an assignment");
    };
    assert!(assignment.target.is_identifier_named("let"));
}

#[test]
fn test_const_requires_initializer() {
    assert_error_code("const x;", 1155);
    assert_error_code("for (const i; ;) {}", 1155);
}

#[test]
fn test_lexical_declaration_needs_block() {
    assert_error_code("if (a) let x = 1;", 1156);
    assert_statement_count("if (a) { let x = 1; }", 1);
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_parse_function_declaration() {
    let program = parse_ok("function foo(a, b) { return a + b; }");
    let Statement::Function(function) = &program.statements[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("foo"));
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.body.statements.len(), 1);
}

#[test]
fn test_parse_function_expression() {
    let expression = expression_of("(function () {});");
    let Expression::Function(function) = expression else {
        panic!("expected a function expression");
    };
    assert!(function.name.is_none());
}

#[test]
fn test_parse_arrow_functions() {
    let Expression::Arrow(arrow) = expression_of("x => x * 2;") else {
        panic!("expected an arrow");
    };
    assert_eq!(arrow.params.len(), 1);
    assert!(matches!(arrow.body, ArrowBody::Expression(_)));

    let Expression::Arrow(arrow) = expression_of("(a, b) => { return a; };") else {
        panic!("expected an arrow");
    };
    assert_eq!(arrow.params.len(), 2);
    assert!(matches!(arrow.body, ArrowBody::Block(_)));

    let Expression::Arrow(arrow) = expression_of("() => 1;") else {
        panic!("expected an arrow");
    };
    assert!(arrow.params.is_empty());
}

#[test]
fn test_arrow_as_argument() {
    let Expression::Call(call) = expression_of("items.map(item => item.id);") else {
        panic!("expected a call");
    };
    assert!(matches!(call.arguments[0], Expression::Arrow(_)));
}

#[test]
fn test_return_outside_function() {
    assert_error_code("return 1;", 1108);
    assert_statement_count("var f = () => { return 1; };", 1);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence() {
    let Expression::Binary(add) = expression_of("1 + 2 * 3;") else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.operator, BinaryOperator::Add);
    let Expression::Binary(mul) = *add.right else {
        panic!("expected multiplication on the right");
    };
    assert_eq!(mul.operator, BinaryOperator::Mul);
}

#[test]
fn test_exponent_is_right_associative() {
    let Expression::Binary(outer) = expression_of("a ** b ** c;") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, BinaryOperator::Exp);
    assert!(outer.left.is_identifier_named("a"));
    assert!(matches!(*outer.right, Expression::Binary(_)));
}

#[test]
fn test_unary_before_exponent_is_rejected() {
    assert_error_code("-a ** 2;", 17006);
    assert_statement_count("(-a) ** 2;", 1);
}

#[test]
fn test_compound_assignment() {
    let Expression::Assignment(assignment) = expression_of("o.count += 1;") else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.operator, AssignmentOperator::Add);
    assert!(matches!(*assignment.target, Expression::Member(_)));
}

#[test]
fn test_conditional_and_sequence() {
    assert!(matches!(expression_of("a ? b : c;"), Expression::Conditional(_)));
    let Expression::Sequence(sequence) = expression_of("a, b, c;") else {
        panic!("expected a sequence");
    };
    assert_eq!(sequence.expressions.len(), 3);
}

#[test]
fn test_unary_and_update() {
    let Expression::Unary(unary) = expression_of("typeof x;") else {
        panic!("expected a unary expression");
    };
    assert_eq!(unary.operator, UnaryOperator::TypeOf);

    let Expression::Update(update) = expression_of("i++;") else {
        panic!("expected an update expression");
    };
    assert!(!update.prefix);
    let Expression::Update(update) = expression_of("--i;") else {
        panic!("expected an update expression");
    };
    assert!(update.prefix);
}

#[test]
fn test_new_and_calls() {
    let Expression::New(new) = expression_of("new a.B(1, 2);") else {
        panic!("expected a new expression");
    };
    assert!(matches!(*new.callee, Expression::Member(_)));
    assert_eq!(new.arguments.len(), 2);

    let Expression::Call(call) = expression_of("new Foo().bar();") else {
        panic!("expected a call");
    };
    let Expression::Member(member) = *call.callee else {
        panic!("expected a member callee");
    };
    assert!(matches!(*member.object, Expression::New(_)));
}

#[test]
fn test_reserved_word_property_names() {
    let Expression::Member(member) = expression_of("a.default.in;") else {
        panic!("expected a member expression");
    };
    let MemberProperty::Named(name) = member.property else {
        panic!("expected a named property");
    };
    assert_eq!(name.name, "in");
}

#[test]
fn test_literals() {
    let Expression::Array(array) = expression_of("[1, , 'two', /re/g];") else {
        panic!("expected an array");
    };
    assert_eq!(array.elements.len(), 4);
    assert!(array.elements[1].is_none());
    let Some(Expression::RegExp(regex)) = &array.elements[3] else {
        panic!("expected a regex");
    };
    assert_eq!(regex.pattern, "re");
    assert_eq!(regex.flags, "g");

    let Expression::Number(number) = expression_of("0x1F;") else {
        panic!("expected a number");
    };
    assert_eq!(number.value, 31.0);
    assert_eq!(number.raw, "0x1F");

    let Expression::String(string) = expression_of(r#""a\tb";"#) else {
        panic!("expected a string");
    };
    assert_eq!(string.value, "a\tb");
    assert_eq!(string.raw, r#""a\tb""#);
}

#[test]
fn test_regex_after_division_context() {
    let Expression::Binary(division) = expression_of("a / b / c;") else {
        panic!("expected a division");
    };
    assert_eq!(division.operator, BinaryOperator::Div);
    assert!(matches!(expression_of("x = /=>/;"), Expression::Assignment(_)));
}

#[test]
fn test_object_literal() {
    let Expression::Object(object) =
        expression_of("({ a: 1, 'b': 2, 3: c, get d() { return 4; }, set d(v) {} });")
    else {
        panic!("expected an object");
    };
    assert_eq!(object.properties.len(), 5);
    assert!(matches!(object.properties[3].value, PropertyValue::Get(_)));
    assert!(matches!(object.properties[4].value, PropertyValue::Set(_)));
    let PropertyKey::Identifier(get_key) = &object.properties[3].key else {
        panic!("expected an identifier key");
    };
    assert_eq!(get_key.name, "d");
}

#[test]
fn test_get_as_plain_key() {
    let Expression::Object(object) = expression_of("({ get: 1, set: 2 });") else {
        panic!("expected an object");
    };
    assert!(object.properties.iter().all(|p| matches!(p.value, PropertyValue::Init(_))));
}

#[test]
fn test_invalid_assignment_targets() {
    assert_error_code("1 = a;", 2364);
    assert_error_code("f() = 1;", 2364);
    assert_error_code("a + b += 1;", 2364);
    assert_error_code("++f();", 2357);
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_parse_loops() {
    let program = parse_ok(
        "for (var i = 0; i < 10; i++) {}\n\
         for (k in o) {}\n\
         for (let v of list) {}\n\
         while (x) x--;\n\
         do { y(); } while (y)",
    );
    assert!(matches!(program.statements[0], Statement::For(_)));
    assert!(matches!(program.statements[1], Statement::ForIn(_)));
    assert!(matches!(program.statements[2], Statement::ForOf(_)));
    assert!(matches!(program.statements[3], Statement::While(_)));
    assert!(matches!(program.statements[4], Statement::DoWhile(_)));
}

#[test]
fn test_in_operator_inside_for_head() {
    let program = parse_ok("for (var i = ('a' in o) ? 1 : 0; i < 2; i++) {}");
    assert!(matches!(program.statements[0], Statement::For(_)));
    let program = parse_ok("for (var k in a in b) {}");
    let Statement::ForIn(for_in) = &program.statements[0] else {
        panic!("expected a for-in");
    };
    assert!(matches!(for_in.right, Expression::Binary(_)));
}

#[test]
fn test_for_in_head_errors() {
    assert_error_code("for (var a, b in o) {}", 1091);
    assert_error_code("for (f() in o) {}", 2406);
    assert_error_code("for (a + b of c) {}", 2406);
}

#[test]
fn test_for_const_in_is_allowed() {
    assert_statement_count("for (const k in o) {}", 1);
}

#[test]
fn test_switch() {
    let program = parse_ok("switch (x) { case 1: a(); break; default: b(); case 2: }");
    let Statement::Switch(switch) = &program.statements[0] else {
        panic!("expected a switch");
    };
    assert_eq!(switch.cases.len(), 3);
    assert!(switch.cases[1].test.is_none());
    assert!(switch.cases[2].consequent.is_empty());

    assert_error_code("switch (x) { default: default: }", 1113);
}

#[test]
fn test_try_statements() {
    assert_statement_count("try { a(); } catch (e) { b(e); } finally { c(); }", 1);
    assert_statement_count("try {} finally {}", 1);
    assert_error_code("try {}", 1472);
}

#[test]
fn test_with_statement() {
    let program = parse_ok("with (o) { x = 1; }");
    assert!(matches!(program.statements[0], Statement::With(_)));
}

// ============================================================================
// Jumps and labels
// ============================================================================

#[test]
fn test_break_and_continue_placement() {
    assert_error_code("break;", 1105);
    assert_error_code("continue;", 1104);
    assert_error_code("switch (x) { case 1: continue; }", 1104);
    assert_statement_count("switch (x) { case 1: break; }", 1);
    assert_statement_count("while (a) { if (b) continue; else break; }", 1);
}

#[test]
fn test_labels() {
    assert_statement_count("outer: for (;;) { inner: while (a) { continue outer; } }", 1);
    assert_statement_count("block: { break block; }", 1);
    assert_statement_count("a: b: while (x) { continue a; }", 1);
    assert_error_code("block: { continue block; }", 1115);
    assert_error_code("while (a) { break missing; }", 1116);
    assert_error_code("while (a) { continue missing; }", 1115);
    assert_error_code("a: { a: ; }", 1114);
}

#[test]
fn test_labels_do_not_cross_functions() {
    assert_error_code("outer: while (a) { (function () { break outer; }); }", 1107);
    assert_statement_count("a: ; a: ;", 2);
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_asi_on_newline() {
    assert_statement_count("var a = 1\nvar b = 2\na + b", 3);
}

#[test]
fn test_asi_before_close_brace() {
    assert_statement_count("function f() { return 1 }", 1);
}

#[test]
fn test_missing_semicolon_on_same_line() {
    let error = parse_err("var a = 1 var b = 2;");
    assert_eq!(error.code, 1005);
    assert_eq!(error.message, "';' expected.");
}

#[test]
fn test_restricted_productions() {
    let program = parse_ok("function f() { return\n1 }");
    let Statement::Function(function) = &program.statements[0] else {
        panic!("expected a function");
    };
    let Statement::Return(ret) = &function.body.statements[0] else {
        panic!("expected a return");
    };
    assert!(ret.argument.is_none());

    assert_statement_count("a\n++b", 2);
    assert_error_code("throw\nerror;", 1142);
}

// ============================================================================
// Unsupported syntax and error locations
// ============================================================================

#[test]
fn test_unsupported_syntax_is_named() {
    let cases = [
        ("class A {}", "Class syntax"),
        ("var s = `x`;", "A template literal"),
        ("var {a} = o;", "A destructuring pattern"),
        ("f(...args);", "Spread and rest syntax"),
        ("a?.b;", "Optional chaining"),
        ("a ?? b;", "Nullish coalescing"),
        ("function* g() {}", "A generator function"),
        ("async function f() {}", "An async function"),
        ("import x from 'y';", "Module syntax"),
        ("a ||= b;", "Logical assignment"),
        ("({ m() {} });", "A method definition"),
        ("({ a });", "A shorthand property"),
        ("(a = 1) => a;", "An arrow function parameter other than a plain identifier"),
    ];
    for (source, feature) in cases {
        let error = parse_err(source);
        assert_eq!(error.code, 1900, "source: {}", source);
        assert_eq!(
            error.message,
            format!("{} is outside the accepted input grammar.", feature),
            "source: {}",
            source
        );
    }
}

#[test]
fn test_error_location_is_one_based() {
    let error = parse_err("var a = 1;\nvar b = );");
    assert_eq!((error.line, error.column), (2, 9));
    assert_eq!(error.code, 1109);
}

#[test]
fn test_scanner_errors_fail_the_parse() {
    assert_error_code("var s = 'unterminated;", 1002);
    assert_error_code("var n = 3in [];", 1351);
}

#[test]
fn test_stray_token_at_statement_start() {
    assert_error_code(")", 1128);
}

#[test]
fn test_empty_program() {
    assert_statement_count("", 0);
    assert_statement_count("// just a comment\n", 0);
}
