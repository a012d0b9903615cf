//! Lexer and parser behavior through the driver.

use arx_diagnostic::{Category, ErrorCode};
use arx_ir::{LexErrorKind, Span, TokenKind};
use arxc::{CompileOptions, Session, Stage};
use pretty_assertions::assert_eq;

use crate::common::{ast_text, codes, compile};

#[test]
fn test_missing_operand_is_one_parse_error() {
    let output = compile("1 +;");
    assert_eq!(codes(&output), vec![ErrorCode::E1002]);
    assert_eq!(output.failed, Some(Stage::Parse));

    let diag = &output.diagnostics[0];
    assert_eq!(diag.message, "expected operand after `+`, found `;`");
    assert_eq!(diag.primary_span(), Some(Span::new(3, 4)));
    assert_eq!(diag.category(), Category::Parse);
}

#[test]
fn test_malformed_number_is_one_token_and_one_error() {
    let session = Session::new(CompileOptions {
        show_tokens: true,
        ..CompileOptions::default()
    });
    let output = session.compile("3.14.15");

    let tokens = output.tokens.as_deref().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::MalformedNumber));
    assert_eq!(tokens[0].span, Span::new(0, 7));
    assert!(tokens[1].is_eof());

    assert_eq!(codes(&output), vec![ErrorCode::E1005]);
    assert_eq!(output.diagnostics[0].primary_span(), Some(Span::new(0, 7)));
}

#[test]
fn test_stray_bad_character_is_lexical() {
    let output = compile("1; $; 2;");
    assert_eq!(codes(&output), vec![ErrorCode::E0001]);
    assert_eq!(output.diagnostics[0].category(), Category::Lexical);
    assert_eq!(output.failed, Some(Stage::Parse));
}

#[test]
fn test_huge_float_is_out_of_range() {
    let output = compile(&format!("def f() 1{}.0;", "0".repeat(400)));
    assert_eq!(codes(&output), vec![ErrorCode::E1005]);
    assert!(output.diagnostics[0]
        .notes
        .iter()
        .any(|note| note.contains("E0003")));
}

#[test]
fn test_recovery_reports_every_item() {
    let output = compile("def f(x x; def g() 1; extern h(; 2 +;");
    assert_eq!(
        codes(&output),
        vec![ErrorCode::E1001, ErrorCode::E1004, ErrorCode::E1002]
    );
    // The one good item survives for `--show-ast`.
    let ast = output.ast.map(|module| module.to_string());
    assert_eq!(ast.as_deref(), Some("def g() 1;\n"));
}

#[test]
fn test_canonical_print_reparses() {
    let printed = ast_text("def f(a, b) a * (b + 2.0) - a / b; f(1.0, 2.0)");
    assert_eq!(ast_text(&printed), printed);
}

#[test]
fn test_token_listing() {
    let session = Session::new(CompileOptions {
        show_tokens: true,
        ..CompileOptions::default()
    });
    let output = session.compile("def f");
    let mut buffer = Vec::new();
    session.write_artifacts(&output, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1:1\tKwDef\t"), "{text}");
    assert!(lines[1].starts_with("1:5\tIdent\tf"), "{text}");
}
