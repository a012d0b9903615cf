//! Semantic analysis through the driver.

use arx_diagnostic::{Category, ErrorCode};
use arxc::Stage;
use pretty_assertions::assert_eq;

use crate::common::{ast_text, check, codes, compile};

#[test]
fn test_arity_mismatch_blocks_lowering() {
    let output = compile("def add(a, b) a + b; add(1, 2, 3);");
    assert_eq!(codes(&output), vec![ErrorCode::E2004]);
    assert_eq!(output.failed, Some(Stage::Check));
    assert!(output.ir.is_none());
    assert_eq!(
        output.diagnostics[0].message,
        "`add` takes 2 arguments but 3 were supplied"
    );
}

#[test]
fn test_errors_are_collected_exhaustively() {
    // Signatures are declared before bodies are checked, so the duplicate
    // comes first.
    let output = check("def f(x: i32) -> bool x + 1; def g() h(1); def f() 1;");
    assert_eq!(
        codes(&output),
        vec![ErrorCode::E2006, ErrorCode::E2005, ErrorCode::E2003]
    );
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.category() == Category::Semantic));
}

#[test]
fn test_inferred_types_are_explicit() {
    assert_eq!(
        ast_text("def f(n: i32, x: f32) n * x;"),
        "def f(n: i32, x: f32) (((n as f32) * x) as f64);\n"
    );
}

#[test]
fn test_suggestion_for_misspelled_name() {
    let output = check("def f(count: i32) cuont + 1;");
    assert_eq!(codes(&output), vec![ErrorCode::E2003]);
    assert_eq!(
        output.diagnostics[0].suggestions,
        vec!["did you mean `count`?".to_owned()]
    );
}
