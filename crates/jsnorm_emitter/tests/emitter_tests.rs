//! Emitter integration tests: normalized programs printed, verified and
//! written to disk.

use jsnorm_emitter::{emit, EmitError, Emitter};
use jsnorm_parser::parse;
use jsnorm_rewrite::{normalize, RewriteOptions};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn normalized_text(source: &str) -> String {
    let mut program = parse(source).expect("source parses");
    normalize(&mut program, &RewriteOptions::default()).expect("normalizes");
    emit(&program).expect("round trip holds")
}

/// A fresh directory under the system temp dir for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jsnorm_emitter_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// ========================================================================
// Round trip
// ========================================================================

#[test]
fn test_canonical_text_is_stable() {
    let first = normalized_text("var o = {}; o.n += 1; for (var k in o) { f(k); }");
    assert_eq!(normalized_text(&first), first);
}

#[test]
fn test_emitted_text_for_short_circuit() {
    assert_eq!(
        normalized_text("var a, b; a && b();"),
        "var a;\nvar b;\nif (a) {\n    b();\n}\n"
    );
}

#[test]
fn test_indent_width() {
    let mut program = parse("if (a) { b; }").expect("parses");
    normalize(&mut program, &RewriteOptions::default()).expect("normalizes");
    let mut emitter = Emitter::new();
    emitter.indent_width = 2;
    assert_eq!(
        emitter.emit_text(&program).expect("emits"),
        "if (a) {\n  b;\n}\n"
    );
}

// ========================================================================
// Output files
// ========================================================================

#[test]
fn test_write_output_files_mirrors_tree() {
    let root = scratch_dir("mirror");
    let mut emitter = Emitter::new();
    emitter.out_dir = Some(root.join("out"));
    emitter.root_dir = Some(PathBuf::from("/project"));

    let program = parse("x;").expect("parses");
    let result = emitter
        .emit(&program, Path::new("/project/lib/util.js"))
        .expect("emits");
    emitter.write_output_files(&result).expect("writes");

    let written = std::fs::read_to_string(root.join("out/lib/util.js")).expect("file exists");
    assert_eq!(written, "x;\n");
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_no_files_without_outdir() {
    let program = parse("x;").expect("parses");
    let result = Emitter::new()
        .emit(&program, Path::new("a.js"))
        .expect("emits");
    assert!(result.output_files.is_empty());
    assert_eq!(result.text, "x;\n");
}

#[test]
fn test_write_error_names_the_path() {
    let root = scratch_dir("blocked");
    std::fs::create_dir_all(&root).expect("scratch dir");
    // A file where a directory is needed.
    std::fs::write(root.join("out"), "").expect("blocker");
    let mut emitter = Emitter::new();
    emitter.out_dir = Some(root.join("out"));

    let program = parse("x;").expect("parses");
    let result = emitter.emit(&program, Path::new("sub/a.js")).expect("emits");
    let err = emitter.write_output_files(&result).expect_err("out is a file");
    assert!(matches!(err, EmitError::Io { .. }));
    assert!(err.to_string().contains("a.js"));
    let _ = std::fs::remove_dir_all(&root);
}
