//! Shared test utilities for phase tests.

use arx_diagnostic::ErrorCode;
use arxc::{CompileOptions, CompileOutput, Session};

/// Compile through lowering with default options.
pub fn compile(source: &str) -> CompileOutput {
    Session::default().compile(source)
}

/// Compile and stop after analysis.
pub fn check(source: &str) -> CompileOutput {
    Session::new(CompileOptions {
        check_only: true,
        ..CompileOptions::default()
    })
    .compile(source)
}

/// Error codes in report order.
pub fn codes(output: &CompileOutput) -> Vec<ErrorCode> {
    output.diagnostics.iter().map(|d| d.code).collect()
}

/// Printed IR of a program that must compile cleanly.
pub fn ir_text(source: &str) -> String {
    let output = compile(source);
    assert!(
        !output.has_errors(),
        "unexpected errors for {source:?}: {:#?}",
        output.diagnostics
    );
    output.ir.expect("clean compile produces IR").to_string()
}

/// Printed annotated AST of a program that must check cleanly.
pub fn ast_text(source: &str) -> String {
    let output = check(source);
    assert!(
        !output.has_errors(),
        "unexpected errors for {source:?}: {:#?}",
        output.diagnostics
    );
    output.ast.expect("clean check produces an AST").to_string()
}
