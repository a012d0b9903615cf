use arx_diagnostic::ErrorCode;
use arx_ir::{ExprKind, Item, Name, Type, ValueForm};
use arx_parse::parse_source;
use arx_types::check_module;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::ir::Predicate;

/// Parse, check and lower a program that must be clean at every stage.
fn lower(source: &str) -> Module {
    let parsed = parse_source(source);
    assert!(!parsed.has_errors(), "parse errors: {:?}", parsed.errors);
    let checked = check_module(&parsed.module);
    assert!(!checked.has_errors(), "type errors: {:?}", checked.errors);
    match lower_module(&checked.module) {
        Ok(module) => module,
        Err(error) => panic!("lowering failed: {error}"),
    }
}

fn lower_one(source: &str) -> Function {
    let mut module = lower(source);
    assert_eq!(module.functions.len(), 1, "{module}");
    module.functions.remove(0)
}

/// Like `lower_one`, with the body's control-flow form turned into a
/// statement before checking.
fn lower_statement(source: &str) -> Function {
    let mut parsed = parse_source(source);
    assert!(!parsed.has_errors(), "parse errors: {:?}", parsed.errors);
    let Some(Item::Function(func)) = parsed.module.items.first_mut() else {
        panic!("expected a function");
    };
    match &mut func.body.kind {
        ExprKind::If(if_expr) => if_expr.form = ValueForm::Statement,
        ExprKind::For(for_expr) => for_expr.form = ValueForm::Statement,
        ExprKind::Var(var_expr) => var_expr.form = ValueForm::Statement,
        other => panic!("expected a control-flow body, got {other:?}"),
    }
    let checked = check_module(&parsed.module);
    assert!(!checked.has_errors(), "type errors: {:?}", checked.errors);
    let mut module = match lower_module(&checked.module) {
        Ok(module) => module,
        Err(error) => panic!("lowering failed: {error}"),
    };
    assert_eq!(module.functions.len(), 1, "{module}");
    let func = module.functions.remove(0);
    assert_eq!(verify_function(&func), Ok(()));
    func
}

// FunctionBuilder

#[test]
fn test_builder_numbers_values_in_order() {
    let mut builder = FunctionBuilder::new();
    let a = builder.fresh_value(Type::I32);
    let b = builder.emit_const(Constant::I32(2));
    let sum = builder.emit_binary(BinOp::IAdd, Type::I32, a, b);
    let cmp = builder.emit_binary(BinOp::ICmp(Predicate::Eq), Type::I32, sum, b);
    assert_eq!([a, b, sum, cmp].map(ValueId::raw), [0, 1, 2, 3]);
    assert_eq!(builder.value_type(sum), Type::I32);
    assert_eq!(builder.value_type(cmp), Type::Bool);
    assert_eq!(builder.value_type(ValueId::new(99)), Type::Error);
}

#[test]
fn test_builder_finish_rejects_unterminated_block() {
    let mut builder = FunctionBuilder::new();
    let value = builder.emit_const(Constant::Bool(true));
    let dangling = builder.new_block();
    builder.terminate_branch(value, dangling, dangling);

    let error = builder.finish(Name::new("f"), vec![], Type::Bool).err();
    assert_eq!(
        error,
        Some(LowerError::Malformed {
            function: Name::new("f"),
            detail: "bb1 has no terminator".to_owned(),
        })
    );
}

#[test]
fn test_builder_block_params() {
    let mut builder = FunctionBuilder::new();
    let start = builder.emit_const(Constant::F64(0));
    let next = builder.new_block();
    builder.terminate_jump(next, vec![start]);
    builder.position_at(next);
    let param = builder.add_block_param(next, Type::F64);
    builder.terminate_return(param);

    let func = match builder.finish(Name::new("g"), vec![], Type::F64) {
        Ok(func) => func,
        Err(error) => panic!("{error}"),
    };
    assert_eq!(func.blocks[1].params, vec![(param, Type::F64)]);
    assert_eq!(verify_function(&func), Ok(()));
}

// Straight-line code

#[test]
fn test_lower_add() {
    let func = lower_one("def add(a, b) a + b;");
    assert_eq!(func.blocks.len(), 1);
    assert_eq!(func.instrs().count(), 1);
    assert_eq!(
        func.to_string(),
        "define f64 @add(f64 %0, f64 %1) {\nbb0:\n  %2 = fadd f64 %0, %1\n  ret %2\n}\n"
    );
}

#[test]
fn test_lower_typed_literals() {
    let func = lower_one("def f() -> i64 1;");
    assert_eq!(
        func.to_string(),
        "define i64 @f() {\nbb0:\n  %0 = const i32 1\n  %1 = sext i32 %0 to i64\n  ret %1\n}\n"
    );
}

#[test]
fn test_lower_mixed_arithmetic_converts_operands() {
    let func = lower_one("def f(x: i32, y: f64) -> f64 x + y;");
    assert_eq!(
        func.to_string(),
        "define f64 @f(i32 %0, f64 %1) {\n\
         bb0:\n  \
         %2 = sitofp i32 %0 to f64\n  \
         %3 = fadd f64 %2, %1\n  \
         ret %3\n\
         }\n"
    );
}

#[test]
fn test_lower_not_of_numeric_tests_first() {
    let func = lower_one("def f(x: i32) -> bool !x;");
    let ops: Vec<String> = func.instrs().map(ToString::to_string).collect();
    assert_eq!(
        ops,
        vec![
            "%1 = itest i32 %0 to bool".to_owned(),
            "%2 = not bool %1".to_owned(),
        ]
    );
}

#[test]
fn test_lower_externs_and_calls() {
    let module = lower("extern sin(x: f64) -> f64;\ndef f(n: i32) -> f64 sin(n);");
    assert_eq!(
        module.to_string(),
        "declare f64 @sin(f64)\n\
         \n\
         define f64 @f(i32 %0) {\n\
         bb0:\n  \
         %1 = sitofp i32 %0 to f64\n  \
         %2 = call f64 @sin(%1)\n  \
         ret %2\n\
         }\n"
    );
}

#[test]
fn test_lower_integer_comparison_is_signed() {
    let func = lower_one("def f(a: i64, b: i64) -> bool a < b;");
    let ops: Vec<String> = func.instrs().map(ToString::to_string).collect();
    assert_eq!(ops, vec!["%2 = icmp slt i64 %0, %1".to_owned()]);
}

// Control flow

#[test]
fn test_lower_if_merges_result() {
    let func = lower_one("def f(c: bool) -> i32 if c then 1 else 2;");
    assert_eq!(
        func.to_string(),
        "define i32 @f(bool %0) {\n\
         bb0:\n  \
         br %0, bb1, bb2\n\
         bb1:\n  \
         %1 = const i32 1\n  \
         jump bb3(%1)\n\
         bb2:\n  \
         %2 = const i32 2\n  \
         jump bb3(%2)\n\
         bb3(%3: i32):\n  \
         ret %3\n\
         }\n"
    );
}

#[test]
fn test_lower_if_merges_assigned_local() {
    let func = lower_one("def f(c: bool) -> i32 var x = 1 in if c then (x = 2) else 0;");
    assert_eq!(
        func.to_string(),
        "define i32 @f(bool %0) {\n\
         bb0:\n  \
         %1 = const i32 1\n  \
         br %0, bb1, bb2\n\
         bb1:\n  \
         %2 = const i32 2\n  \
         jump bb3(%2, %2)\n\
         bb2:\n  \
         %3 = const i32 0\n  \
         jump bb3(%3, %1)\n\
         bb3(%4: i32, %5: i32):\n  \
         ret %4\n\
         }\n"
    );
}

#[test]
fn test_lower_for_loop() {
    let func = lower_one("def f(n: i32) for i = 0, i < n in i;");
    assert_eq!(
        func.to_string(),
        "define f64 @f(i32 %0) {\n\
         bb0:\n  \
         %1 = const i32 0\n  \
         jump bb1(%1)\n\
         bb1(%2: i32):\n  \
         %3 = const i32 1\n  \
         %4 = iadd i32 %2, %3\n  \
         %5 = icmp slt i32 %4, %0\n  \
         br %5, bb2, bb3\n\
         bb2:\n  \
         jump bb1(%4)\n\
         bb3:\n  \
         %6 = sitofp i32 %2 to f64\n  \
         ret %6\n\
         }\n"
    );
}

#[test]
fn test_lower_for_carries_assigned_locals() {
    let func =
        lower_one("def f() -> i32 var s = 0, t = 5 in (for i = 0, i < 3 in s = s + i) + t;");
    // entry, header, continue, exit
    assert_eq!(func.blocks.len(), 4);
    let header = &func.blocks[1];
    let param_types: Vec<Type> = header.params.iter().map(|(_, ty)| *ty).collect();
    // The induction variable and `s`; `t` is never assigned in the loop.
    assert_eq!(param_types, vec![Type::I32, Type::I32]);
    match &func.blocks[2].terminator {
        Terminator::Jump { target, args } => {
            assert_eq!(*target, header.id);
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected a back edge, got {other}"),
    }
}

#[test]
fn test_lower_var_scoping() {
    let func = lower_one("def f(x: f64) var x = 2.0, y = x * 3.0 in y;");
    assert_eq!(
        func.to_string(),
        "define f64 @f(f64 %0) {\n\
         bb0:\n  \
         %1 = const f64 2.0\n  \
         %2 = const f64 3.0\n  \
         %3 = fmul f64 %1, %2\n  \
         ret %3\n\
         }\n"
    );
}

#[test]
fn test_lower_assignment_yields_value() {
    let func = lower_one("def f(x: f64) x = 1.5;");
    assert_eq!(
        func.to_string(),
        "define f64 @f(f64 %0) {\nbb0:\n  %1 = const f64 1.5\n  ret %1\n}\n"
    );
}

#[test]
fn test_lower_tail_return() {
    assert_eq!(
        lower_one("def f(a: i32) -> f64 return a;").to_string(),
        "define f64 @f(i32 %0) {\nbb0:\n  %1 = sitofp i32 %0 to f64\n  ret %1\n}\n"
    );
    assert_eq!(
        lower_one("def f(c: bool) -> i32 if c then return 1 else 2;"),
        lower_one("def f(c: bool) -> i32 if c then 1 else 2;")
    );
}

// Statement forms

#[test]
fn test_lower_statement_if_merges_locals_only() {
    let func = lower_statement("def f(c: bool, x: i32) -> unit if c then x = 2 else 0;");
    assert_eq!(
        func.to_string(),
        "define unit @f(bool %0, i32 %1) {\n\
         bb0:\n  \
         br %0, bb1, bb2\n\
         bb1:\n  \
         %2 = const i32 2\n  \
         jump bb3(%2)\n\
         bb2:\n  \
         %3 = const i32 0\n  \
         jump bb3(%1)\n\
         bb3(%4: i32):\n  \
         %5 = const unit\n  \
         ret %5\n\
         }\n"
    );
}

#[test]
fn test_lower_statement_for_yields_unit() {
    let func = lower_statement("def f(n: i32) -> unit for i = 0, i < n in i;");
    let exit = &func.blocks[3];
    assert_eq!(
        exit.to_string(),
        "bb3:\n  %6 = const unit\n  ret %6\n"
    );
    assert_eq!(func.ret, Type::Unit);
}

#[test]
fn test_lower_statement_var_yields_unit() {
    let func = lower_statement("var x = 1.5 in x * 2.0;");
    assert_eq!(func.ret, Type::Unit);
    let ops: Vec<String> = func.instrs().map(ToString::to_string).collect();
    assert_eq!(
        ops,
        vec![
            "%0 = const f64 1.5".to_owned(),
            "%1 = const f64 2.0".to_owned(),
            "%2 = fmul f64 %0, %1".to_owned(),
            "%3 = const unit".to_owned(),
        ]
    );
}

// Module level

#[test]
fn test_anonymous_expressions_lower_in_order() {
    let module = lower("def f(x) x; 1; 2.5");
    let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f", "__anon_expr", "__anon_expr.1"]);
    assert_eq!(module.functions[1].ret, Type::I32);
    assert_eq!(module.functions[2].ret, Type::F64);
}

#[test]
fn test_lowering_is_deterministic() {
    let source = "def f(c: bool, n: i32) -> i32 var s = 0 in \
                  if c then (for i = 0, i < n in s = s + i) else s;";
    let parsed = parse_source(source);
    let checked = check_module(&parsed.module);
    assert!(!checked.has_errors(), "{:?}", checked.errors);
    let first = lower_module(&checked.module);
    let second = lower_module(&checked.module);
    assert!(first.is_ok(), "{first:?}");
    assert_eq!(first, second);
}

#[test]
fn test_unchecked_module_is_internal_error() {
    let parsed = parse_source("def f(x) x;");
    assert!(!parsed.has_errors());
    let error = match lower_module(&parsed.module) {
        Err(error) => error,
        Ok(module) => panic!("lowered an unchecked module:\n{module}"),
    };
    assert_eq!(error.code(), ErrorCode::E9001);
    assert!(matches!(
        error,
        LowerError::MissingType {
            what: "parameter",
            ..
        }
    ));
}

fn arb_body() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_owned()),
        Just("n".to_owned()),
        (0i32..100).prop_map(|v| v.to_string()),
        (0u8..10).prop_map(|v| format!("{v}.5")),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        let ops = prop_oneof![Just("+"), Just("-"), Just("*"), Just("<")];
        prop_oneof![
            (inner.clone(), ops, inner.clone()).prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| format!("(if {c} then {t} else {e})")),
            (inner.clone(), inner.clone())
                .prop_map(|(e, b)| format!("(for i = 0, i < {e} in {b})")),
            (inner.clone(), inner.clone()).prop_map(|(v, b)| format!("(var a = {v} in {b})")),
            inner.prop_map(|v| format!("(a = {v})")),
        ]
    })
}

proptest! {
    #[test]
    fn prop_lowered_functions_verify(body in arb_body()) {
        let source = format!("def f(a: f64, n: i32) {body};");
        let parsed = parse_source(&source);
        prop_assert!(!parsed.has_errors(), "{source}: {:?}", parsed.errors);
        let checked = check_module(&parsed.module);
        // Some generated bodies are ill-typed (e.g. `a = (x < y)`); those
        // never reach lowering.
        prop_assume!(!checked.has_errors());

        let first = lower_module(&checked.module);
        prop_assert!(first.is_ok(), "{source}: {first:?}");
        prop_assert_eq!(&first, &lower_module(&checked.module));
        if let Ok(module) = first {
            for func in &module.functions {
                prop_assert_eq!(verify_function(func), Ok(()));
                prop_assert_eq!(func.entry().id, BlockId::ENTRY);
            }
        }
    }
}
