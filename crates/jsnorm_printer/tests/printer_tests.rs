//! Printer integration tests.
//!
//! Each case parses a source, prints it and compares the text. The printed
//! text must also parse back to the same tree.

use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_parser::parse;
use jsnorm_printer::{print_expression, print_program, Printer, PrinterOptions};
use pretty_assertions::assert_eq;

/// Helper: parse, print, check the round trip, return the text.
fn reprint(source: &str) -> String {
    let program = parse(source).expect("source parses");
    let text = print_program(&program);
    let reparsed = parse(&text).unwrap_or_else(|e| panic!("printed text fails to parse: {e}\n{text}"));
    assert_eq!(reparsed, program, "printed text changed the tree:\n{text}");
    text
}

// ========================================================================
// Statements
// ========================================================================

#[test]
fn test_empty_program() {
    assert_eq!(reprint(""), "");
}

#[test]
fn test_one_statement_per_line() {
    assert_eq!(reprint("var a = 1, b; a; debugger; ;"), "var a = 1, b;\na;\ndebugger;\n;\n");
}

#[test]
fn test_blocks_and_indentation() {
    assert_eq!(
        reprint("function f(a, b) { if (a) { return b; } else return; }"),
        "function f(a, b) {\n    if (a) {\n        return b;\n    } else return;\n}\n"
    );
}

#[test]
fn test_loops() {
    assert_eq!(
        reprint("for (var i = 0; i < n; i++) {} for (;;) ; for (k in o) {} for (let v of xs) {}"),
        "for (var i = 0; i < n; i++) {}\nfor (;;) ;\nfor (k in o) {}\nfor (let v of xs) {}\n"
    );
    assert_eq!(reprint("do x(); while (y);"), "do x(); while (y);\n");
}

#[test]
fn test_labels_and_jumps() {
    assert_eq!(
        reprint("outer: while (a) { continue outer; break; }"),
        "outer: while (a) {\n    continue outer;\n    break;\n}\n"
    );
}

#[test]
fn test_switch() {
    assert_eq!(
        reprint("switch (x) { case 1: a(); break; default: b(); }"),
        "switch (x) {\n    case 1:\n        a();\n        break;\n    default:\n        b();\n}\n"
    );
}

#[test]
fn test_try_and_with() {
    assert_eq!(
        reprint("try { a(); } catch (e) { throw e; } finally {} with (o) x;"),
        "try {\n    a();\n} catch (e) {\n    throw e;\n} finally {}\nwith (o) x;\n"
    );
}

// ========================================================================
// Expressions
// ========================================================================

#[test]
fn test_precedence_parentheses() {
    assert_eq!(reprint("(a + b) * c; a + b * c; a - (b - c); (a, b);"), "(a + b) * c;\na + b * c;\na - (b - c);\na, b;\n");
    assert_eq!(reprint("(a || b) && c; a ? b : (c, d);"), "(a || b) && c;\na ? b : (c, d);\n");
    assert_eq!(reprint("x = (a ? b : c) ? d : e;"), "x = (a ? b : c) ? d : e;\n");
}

#[test]
fn test_exponent_associativity() {
    assert_eq!(reprint("a ** b ** c; (a ** b) ** c; (-a) ** b;"), "a ** b ** c;\n(a ** b) ** c;\n(-a) ** b;\n");
}

#[test]
fn test_unary_spacing() {
    assert_eq!(reprint("- -x; + +x; -(--x); typeof x; !a;"), "- -x;\n+ +x;\n- --x;\ntypeof x;\n!a;\n");
}

#[test]
fn test_statement_start_parentheses() {
    assert_eq!(reprint("(function () {})();"), "(function() {}());\n");
    assert_eq!(reprint("({}).x = 1;"), "({}.x = 1);\n");
    assert_eq!(reprint("f = function () {};"), "f = function() {};\n");
}

#[test]
fn test_new_and_calls() {
    assert_eq!(reprint("new (f())(); new (f().g)(); new a.b(1); new X;"), "new (f())();\nnew (f().g)();\nnew a.b(1);\nnew X();\n");
    assert_eq!(reprint("(1).toString(); a.b[c](d);"), "(1).toString();\na.b[c](d);\n");
}

#[test]
fn test_arrows() {
    assert_eq!(reprint("f = x => ({ a: x });"), "f = (x) => ({\n    a: x\n});\n");
    assert_eq!(reprint("(() => 1)();"), "(() => 1)();\n");
    assert_eq!(reprint("g = (a, b) => { return a; };"), "g = (a, b) => {\n    return a;\n};\n");
}

#[test]
fn test_literals_print_verbatim() {
    assert_eq!(reprint("x = [0x1F, 'a\\'b', /re/gi, 1e3, , ];"), "x = [0x1F, 'a\\'b', /re/gi, 1e3, ,];\n");
    assert_eq!(reprint("x = [a, , b];"), "x = [a, , b];\n");
}

#[test]
fn test_object_accessors() {
    assert_eq!(
        reprint("o = { a: 1, 'b c': 2, get d() { return 1; }, set d(v) {} };"),
        "o = {\n    a: 1,\n    'b c': 2,\n    get d() {\n        return 1;\n    },\n    set d(v) {}\n};\n"
    );
}

#[test]
fn test_in_inside_for_head() {
    assert_eq!(reprint("for (var a = (b in c); ;) {}"), "for (var a = (b in c);;) {}\n");
    assert_eq!(reprint("for ((a in b); ;) {}"), "for ((a in b);;) {}\n");
}

// ========================================================================
// Synthesized trees and options
// ========================================================================

#[test]
fn test_synthesized_nested_assignment_gets_parens() {
    // a.b = (c, d) is built directly; no source spells it.
    let expr = factory::assign(
        factory::member(factory::reference("a"), "b"),
        factory::sequence(vec![factory::reference("c"), factory::reference("d")]),
    );
    assert_eq!(print_expression(&expr), "a.b = (c, d)");
}

#[test]
fn test_custom_options() {
    let program = parse("if (a) { b; }").expect("parses");
    let mut printer = Printer::with_options(PrinterOptions {
        indent_str: "\t".to_string(),
        new_line: "\r\n".to_string(),
        trailing_newline: false,
    });
    assert_eq!(printer.print_program(&program), "if (a) {\r\n\tb;\r\n}");
}

#[test]
fn test_printer_is_reusable() {
    let mut printer = Printer::new();
    let first = parse("a;").expect("parses");
    let second = parse("b;").expect("parses");
    assert_eq!(printer.print_program(&first), "a;\n");
    assert_eq!(printer.print_program(&second), "b;\n");
    assert!(matches!(second.statements[0], Statement::Expression(_)));
}
