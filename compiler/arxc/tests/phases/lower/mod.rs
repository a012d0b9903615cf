//! IR lowering through the driver.

use arx_diagnostic::ErrorCode;
use arx_ir::Type;
use pretty_assertions::assert_eq;

use crate::common::{codes, compile, ir_text};

#[test]
fn test_add_lowers_to_one_block() {
    let output = compile("def add(a, b) a + b;");
    let ir = output.ir.unwrap();
    assert_eq!(ir.functions.len(), 1);

    let add = ir.function("add").unwrap();
    assert_eq!(add.params.len(), 2);
    assert!(add.params.iter().all(|p| p.ty == Type::F64));
    assert_eq!(add.ret, Type::F64);
    assert_eq!(add.blocks.len(), 1);
    assert_eq!(add.instrs().count(), 1);
    assert_eq!(add.entry().terminator.to_string(), "ret %2");
}

#[test]
fn test_compiling_twice_is_identical() {
    let source = "extern cos(x: f64) -> f64;\n\
                  def walk(n: i32) -> f64 \
                      var acc = 0.0 in \
                      (for i = 0, i < n in \
                          if i < 10 then (acc = acc + cos(i)) else (acc = acc - 1.0)) \
                      + acc;\n\
                  walk(4);";
    let first = ir_text(source);
    assert_eq!(first, ir_text(source));
    assert!(first.starts_with("declare f64 @cos(f64)\n\n"), "{first}");
}

#[test]
fn test_every_function_is_lowered_in_order() {
    let ir = compile("def a() 1; extern b(); def c() a(); c()").ir.unwrap();
    let names: Vec<&str> = ir.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "__anon_expr"]);
    assert_eq!(ir.externs.len(), 1);
    assert_eq!(ir.externs[0].ret, Type::F64);
}

#[test]
fn test_lowering_never_runs_after_errors() {
    let output = compile("def f(x: i32) -> i32 x + 1.5;");
    assert_eq!(codes(&output), vec![ErrorCode::E2005]);
    assert!(output.ir.is_none());
}

#[test]
fn test_tail_return_lowers_to_ret() {
    assert_eq!(
        ir_text("fn f(a: i32, b: i32) -> i32: return a;"),
        "define i32 @f(i32 %0, i32 %1) {\nbb0:\n  ret %0\n}\n"
    );
    let output = compile("def f(x) 1 + return x;");
    assert_eq!(codes(&output), vec![ErrorCode::E2011]);
    assert!(output.ir.is_none());
}
