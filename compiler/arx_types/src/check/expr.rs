//! Expression rules.
//!
//! Each rule checks its children first, then decides its own type. A child
//! whose type is `Type::Error` satisfies every rule, so one mistake yields
//! one error.

use arx_ir::{
    BinaryOp, Expr, ExprKind, ForExpr, IfExpr, Name, Span, Type, UnaryOp, ValueForm, VarBinding,
    VarExpr,
};
use arx_stack::ensure_sufficient_stack;

use super::Checker;
use crate::env::{Scope, Symbol, SymbolKind};
use crate::widen::{can_widen, common_type};
use crate::SemanticError;

/// Resolved type of a checked expression.
#[inline]
pub(crate) fn ty_of(expr: &Expr) -> Type {
    expr.ty.unwrap_or(Type::Error)
}

/// Wrap `expr` in a conversion to `target` unless it already has that type.
pub(crate) fn coerce(expr: Expr, target: Type) -> Expr {
    let ty = ty_of(&expr);
    if ty == target || ty.is_error() || target.is_error() {
        return expr;
    }
    let span = expr.span;
    Expr::typed(ExprKind::Convert(Box::new(expr)), span, target)
}

/// Zero value of `ty` as a literal, for `var` bindings without an
/// initializer. `unit` has no literal.
fn zero_literal(ty: Type, span: Span) -> Option<Expr> {
    let kind = match ty {
        Type::I32 | Type::I64 => ExprKind::Int(0),
        Type::F32 | Type::F64 => ExprKind::Float(0f64.to_bits()),
        Type::Bool => ExprKind::Bool(false),
        Type::Unit | Type::Error => return None,
    };
    Some(Expr::typed(kind, span, ty))
}

impl Checker {
    pub(crate) fn check_expr(&mut self, expr: &Expr, scope: &Scope) -> Expr {
        ensure_sufficient_stack(|| self.check_expr_inner(expr, scope))
    }

    fn check_expr_inner(&mut self, expr: &Expr, scope: &Scope) -> Expr {
        let tail = std::mem::take(&mut self.in_tail);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(value) => {
                let ty = if i32::try_from(*value).is_ok() {
                    Type::I32
                } else {
                    Type::I64
                };
                Expr::typed(ExprKind::Int(*value), span, ty)
            }
            ExprKind::Float(bits) => Expr::typed(ExprKind::Float(*bits), span, Type::F64),
            ExprKind::Bool(value) => Expr::typed(ExprKind::Bool(*value), span, Type::Bool),
            ExprKind::Ident(name) => self.check_ident(name, span, scope),
            ExprKind::Binary { op, left, right } => {
                self.check_binary(*op, left, right, span, scope)
            }
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand, span, scope),
            ExprKind::Call {
                callee,
                callee_span,
                args,
            } => self.check_call(callee, *callee_span, args, span, scope),
            ExprKind::If(if_expr) => self.check_if(if_expr, span, tail, scope),
            ExprKind::For(for_expr) => self.check_for(for_expr, span, scope),
            ExprKind::Var(var_expr) => self.check_var(var_expr, span, tail, scope),
            ExprKind::Assign {
                target,
                target_span,
                value,
            } => self.check_assign(target, *target_span, value, span, scope),
            ExprKind::Return(value) => self.check_return(value, span, tail, scope),
            ExprKind::Convert(operand) => {
                let operand = self.check_value(operand, scope);
                let ty = expr.ty.unwrap_or_else(|| ty_of(&operand));
                Expr::typed(ExprKind::Convert(Box::new(operand)), span, ty)
            }
        }
    }

    /// Check an expression whose value is used.
    fn check_value(&mut self, expr: &Expr, scope: &Scope) -> Expr {
        let mut checked = self.check_expr(expr, scope);
        if expr.form() == ValueForm::Statement {
            self.report(SemanticError::statement_as_value(expr.span));
            checked.ty = Some(Type::Error);
        }
        checked
    }

    /// Check a value and widen it to `target`, reporting `E2001` if it
    /// cannot be.
    fn check_widened(&mut self, expr: &Expr, target: Type, context: &str, scope: &Scope) -> Expr {
        let checked = self.check_value(expr, scope);
        self.widen_to(checked, target, context)
    }

    fn widen_to(&mut self, checked: Expr, target: Type, context: &str) -> Expr {
        let found = ty_of(&checked);
        if can_widen(found, target) {
            coerce(checked, target)
        } else {
            self.report(SemanticError::mismatch(checked.span, target, found, context));
            checked
        }
    }

    /// Conditions are `bool`, or numeric and compared against zero.
    fn check_condition(&mut self, expr: &Expr, scope: &Scope) -> Expr {
        let cond = self.check_value(expr, scope);
        let ty = ty_of(&cond);
        if ty.is_numeric() {
            coerce(cond, Type::Bool)
        } else {
            if ty != Type::Bool && !ty.is_error() {
                self.report(SemanticError::mismatch(
                    cond.span,
                    Type::Bool,
                    ty,
                    "condition must be `bool` or numeric",
                ));
            }
            cond
        }
    }

    fn check_ident(&mut self, name: &Name, span: Span, scope: &Scope) -> Expr {
        let ty = match scope.lookup(name.as_str()) {
            Some(symbol) if !symbol.kind.is_function() => symbol.ty,
            Some(_) => {
                self.report(SemanticError::function_as_value(span, name));
                Type::Error
            }
            None => {
                let similar = scope.find_similar(name.as_str(), 1, |s| !s.kind.is_function());
                self.report(SemanticError::unknown_identifier(
                    span,
                    name.as_str(),
                    &similar,
                ));
                Type::Error
            }
        };
        Expr::typed(ExprKind::Ident(name.clone()), span, ty)
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
        scope: &Scope,
    ) -> Expr {
        let left = self.check_value(left, scope);
        let right = self.check_value(right, scope);
        let (lt, rt) = (ty_of(&left), ty_of(&right));

        let operand_ty = if lt.is_error() || rt.is_error() {
            Some(Type::Error)
        } else if op.is_equality() && lt == Type::Bool && rt == Type::Bool {
            Some(Type::Bool)
        } else if lt.is_numeric() && rt.is_numeric() && op != BinaryOp::Assign {
            common_type(lt, rt)
        } else {
            None
        };

        let Some(operand_ty) = operand_ty else {
            self.report(SemanticError::binary_operands(span, op, lt, rt));
            return Expr::typed(binary(op, left, right), span, Type::Error);
        };
        let ty = if op.is_comparison() {
            Type::Bool
        } else {
            operand_ty
        };
        let left = coerce(left, operand_ty);
        let right = coerce(right, operand_ty);
        Expr::typed(binary(op, left, right), span, ty)
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span, scope: &Scope) -> Expr {
        let operand = self.check_value(operand, scope);
        let ty = ty_of(&operand);
        let (operand, result) = match op {
            UnaryOp::Neg if ty.is_numeric() || ty.is_error() => (operand, ty),
            UnaryOp::Not if ty == Type::Bool || ty.is_error() => (operand, Type::Bool),
            UnaryOp::Not if ty.is_numeric() => (coerce(operand, Type::Bool), Type::Bool),
            UnaryOp::Neg | UnaryOp::Not => {
                self.report(SemanticError::unary_operand(span, op, ty));
                (operand, Type::Error)
            }
        };
        Expr::typed(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
            result,
        )
    }

    fn check_call(
        &mut self,
        callee: &Name,
        callee_span: Span,
        args: &[Expr],
        span: Span,
        scope: &Scope,
    ) -> Expr {
        let mut args: Vec<Expr> = args.iter().map(|arg| self.check_value(arg, scope)).collect();

        let ty = match scope.lookup(callee.as_str()) {
            Some(Symbol {
                kind: SymbolKind::Function { params },
                ty,
                span: decl,
            }) => {
                if params.len() == args.len() {
                    args = args
                        .into_iter()
                        .zip(params.iter())
                        .enumerate()
                        .map(|(i, (arg, param))| {
                            let context = format!("argument {} of `{callee}`", i + 1);
                            self.widen_to(arg, *param, &context)
                        })
                        .collect();
                } else {
                    self.report(SemanticError::arity(
                        span,
                        callee,
                        params.len(),
                        args.len(),
                        *decl,
                    ));
                }
                *ty
            }
            Some(symbol) => {
                self.report(SemanticError::not_a_function(
                    callee_span,
                    callee,
                    symbol.kind.describe(),
                    symbol.span,
                ));
                Type::Error
            }
            None => {
                let similar = scope.find_similar(callee.as_str(), 1, |s| s.kind.is_function());
                self.report(SemanticError::unknown_function(
                    callee_span,
                    callee.as_str(),
                    &similar,
                ));
                Type::Error
            }
        };

        Expr::typed(
            ExprKind::Call {
                callee: callee.clone(),
                callee_span,
                args,
            },
            span,
            ty,
        )
    }

    fn check_if(&mut self, if_expr: &IfExpr, span: Span, tail: bool, scope: &Scope) -> Expr {
        let cond = self.check_condition(&if_expr.cond, scope);
        // Only a value-form `if` passes a branch's value on as its own.
        let tail = tail && if_expr.form == ValueForm::Value;
        self.in_tail = tail;
        let then_branch = self.check_expr(&if_expr.then_branch, scope);
        self.in_tail = tail;
        let else_branch = self.check_expr(&if_expr.else_branch, scope);
        let (then_ty, else_ty) = (ty_of(&then_branch), ty_of(&else_branch));

        let (then_branch, else_branch, ty) = match if_expr.form {
            ValueForm::Statement => (then_branch, else_branch, Type::Unit),
            ValueForm::Value => match common_type(then_ty, else_ty) {
                Some(common) => (
                    coerce(then_branch, common),
                    coerce(else_branch, common),
                    common,
                ),
                None => {
                    self.report(SemanticError::branch_mismatch(
                        else_branch.span,
                        then_ty,
                        else_ty,
                        then_branch.span,
                    ));
                    (then_branch, else_branch, Type::Error)
                }
            },
        };

        let checked = IfExpr {
            cond,
            then_branch,
            else_branch,
            form: if_expr.form,
        };
        Expr::typed(ExprKind::If(Box::new(checked)), span, ty)
    }

    fn check_for(&mut self, for_expr: &ForExpr, span: Span, scope: &Scope) -> Expr {
        let start = self.check_value(&for_expr.start, scope);
        let mut var_ty = match &for_expr.var_ty {
            Some(annotation) => self.resolve_type(annotation),
            None => ty_of(&start),
        };
        if !var_ty.is_numeric() && !var_ty.is_error() {
            self.report(SemanticError::mismatch(
                for_expr.var_span,
                Type::DEFAULT_SCALAR,
                var_ty,
                "loop variable must be numeric",
            ));
            var_ty = Type::Error;
        }
        let start = self.widen_to(start, var_ty, "loop start must widen to the loop variable");

        let mut inner = scope.child();
        inner.bind(
            for_expr.var.clone(),
            Symbol {
                kind: SymbolKind::Induction,
                ty: var_ty,
                span: for_expr.var_span,
            },
        );

        let end = self.check_condition(&for_expr.end, &inner);
        let step = match &for_expr.step {
            Some(step) => self.check_widened(step, var_ty, "step must widen to the loop variable", &inner),
            None => coerce(
                Expr::typed(ExprKind::Int(1), for_expr.var_span, Type::I32),
                var_ty,
            ),
        };
        let body = self.check_expr(&for_expr.body, &inner);

        let ty = match for_expr.form {
            ValueForm::Value => ty_of(&body),
            ValueForm::Statement => Type::Unit,
        };
        let checked = ForExpr {
            var: for_expr.var.clone(),
            var_span: for_expr.var_span,
            var_ty: for_expr.var_ty.clone(),
            start,
            end,
            step: Some(step),
            body,
            form: for_expr.form,
        };
        Expr::typed(ExprKind::For(Box::new(checked)), span, ty)
    }

    fn check_var(&mut self, var_expr: &VarExpr, span: Span, tail: bool, scope: &Scope) -> Expr {
        let mut inner = scope.child();
        let mut bindings = Vec::with_capacity(var_expr.bindings.len());

        for binding in &var_expr.bindings {
            if let Some(first) = inner.lookup_local(binding.name.as_str()) {
                let first = first.span;
                self.report(SemanticError::duplicate(
                    binding.span,
                    &binding.name,
                    "variable",
                    first,
                ));
            }

            let annotated = binding.ty.as_ref().map(|ty| self.resolve_type(ty));
            // Earlier bindings are visible to later initializers.
            let init = binding
                .init
                .as_ref()
                .map(|init| self.check_value(init, &inner));
            let ty = annotated
                .or_else(|| init.as_ref().map(ty_of))
                .unwrap_or(Type::DEFAULT_SCALAR);
            let init = match init {
                Some(init) => Some(self.widen_to(
                    init,
                    ty,
                    "initializer must widen to the declared type",
                )),
                None => zero_literal(ty, binding.span),
            };

            inner.bind(
                binding.name.clone(),
                Symbol {
                    kind: SymbolKind::Binding,
                    ty,
                    span: binding.span,
                },
            );
            bindings.push(VarBinding {
                name: binding.name.clone(),
                span: binding.span,
                ty: binding.ty.clone(),
                init,
            });
        }

        self.in_tail = tail && var_expr.form == ValueForm::Value;
        let body = self.check_expr(&var_expr.body, &inner);
        let ty = match var_expr.form {
            ValueForm::Value => ty_of(&body),
            ValueForm::Statement => Type::Unit,
        };
        let checked = VarExpr {
            bindings,
            body,
            form: var_expr.form,
        };
        Expr::typed(ExprKind::Var(Box::new(checked)), span, ty)
    }

    /// `return value` yields `value` widened to the declared return type.
    /// It is accepted only where that value is the function's result.
    fn check_return(&mut self, value: &Expr, span: Span, tail: bool, scope: &Scope) -> Expr {
        let value = self.check_value(value, scope);
        if !tail {
            self.report(SemanticError::misplaced_return(span));
            return Expr::typed(ExprKind::Return(Box::new(value)), span, Type::Error);
        }
        let (value, ty) = match self.ret {
            Some(ret) => (
                self.widen_to(value, ret, "returned value must widen to the return type"),
                ret,
            ),
            None => {
                let ty = ty_of(&value);
                (value, ty)
            }
        };
        Expr::typed(ExprKind::Return(Box::new(value)), span, ty)
    }

    fn check_assign(
        &mut self,
        target: &Name,
        target_span: Span,
        value: &Expr,
        span: Span,
        scope: &Scope,
    ) -> Expr {
        let value = self.check_value(value, scope);
        let ty = match scope.lookup(target.as_str()) {
            Some(symbol) if !symbol.kind.is_function() => {
                let ty = symbol.ty;
                let value = self.widen_to(
                    value,
                    ty,
                    "assigned value must widen to the variable's type",
                );
                return Expr::typed(assign(target, target_span, value), span, ty);
            }
            Some(symbol) => {
                self.report(SemanticError::invalid_assignment(
                    target_span,
                    target,
                    symbol.kind.describe(),
                    symbol.span,
                ));
                Type::Error
            }
            None => {
                let similar = scope.find_similar(target.as_str(), 1, |s| !s.kind.is_function());
                self.report(SemanticError::unknown_identifier(
                    target_span,
                    target.as_str(),
                    &similar,
                ));
                Type::Error
            }
        };
        Expr::typed(assign(target, target_span, value), span, ty)
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> ExprKind {
    ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn assign(target: &Name, target_span: Span, value: Expr) -> ExprKind {
    ExprKind::Assign {
        target: target.clone(),
        target_span,
        value: Box::new(value),
    }
}
