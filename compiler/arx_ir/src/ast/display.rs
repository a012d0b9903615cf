//! Canonical source printing.
//!
//! Every compound expression is printed fully parenthesized, so re-lexing
//! and re-parsing the output reproduces the same tree (spans aside)
//! regardless of precedence. `Convert` nodes exist only in checked trees and
//! print as `(expr as type)`, which is not source syntax.

use std::fmt;

use super::{Expr, ExprKind, Function, Item, Module, Param, ParsedType, Prototype};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Int(n) => write!(f, "{n}"),
            ExprKind::Float(bits) => write_float(f, f64::from_bits(*bits)),
            ExprKind::Bool(b) => write!(f, "{b}"),
            ExprKind::Ident(name) => write!(f, "{name}"),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_symbol())
            }
            ExprKind::Unary { op, operand } => write!(f, "({}{operand})", op.as_symbol()),
            ExprKind::Call { callee, args, .. } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::If(if_expr) => write!(
                f,
                "(if {} then {} else {})",
                if_expr.cond, if_expr.then_branch, if_expr.else_branch
            ),
            ExprKind::For(for_expr) => {
                write!(f, "(for {}", for_expr.var)?;
                write_annotation(f, for_expr.var_ty.as_ref())?;
                write!(f, " = {}, {}", for_expr.start, for_expr.end)?;
                if let Some(step) = &for_expr.step {
                    write!(f, ", {step}")?;
                }
                write!(f, " in {})", for_expr.body)
            }
            ExprKind::Var(var_expr) => {
                f.write_str("(var ")?;
                for (i, binding) in var_expr.bindings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", binding.name)?;
                    write_annotation(f, binding.ty.as_ref())?;
                    if let Some(init) = &binding.init {
                        write!(f, " = {init}")?;
                    }
                }
                write!(f, " in {})", var_expr.body)
            }
            ExprKind::Assign { target, value, .. } => write!(f, "({target} = {value})"),
            ExprKind::Return(value) => write!(f, "(return {value})"),
            ExprKind::Convert(operand) => match self.ty {
                Some(ty) => write!(f, "({operand} as {ty})"),
                None => write!(f, "({operand} as ?)"),
            },
        }
    }
}

/// Floats always print with a decimal point so they re-lex as floats.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let text = value.to_string();
    if text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

fn write_annotation(f: &mut fmt::Formatter<'_>, ty: Option<&ParsedType>) -> fmt::Result {
    match ty {
        Some(ty) => write!(f, ": {}", ty.name),
        None => Ok(()),
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_annotation(f, self.ty.as_ref())
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {}", ret.name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anonymous {
            write!(f, "{};", self.body)
        } else {
            write!(f, "def {} {};", self.proto, self.body)
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Function(func) => write!(f, "{func}"),
            Item::Extern(proto) => write!(f, "extern {proto};"),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}
