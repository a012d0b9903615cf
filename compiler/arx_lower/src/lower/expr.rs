//! Expression lowering.
//!
//! Straight-line forms lower here; `if`, `for`, `var` and assignment are in
//! `control_flow.rs`. Every node's opcode comes from the type the checker
//! wrote on it.

use arx_ir::{BinaryOp, Expr, ExprKind, Name, Span, Type, UnaryOp};
use arx_stack::ensure_sufficient_stack;

use super::scope::LowerScope;
use super::FunctionBuilder;
use crate::error::LowerError;
use crate::ir::{BinOp, ConvOp, Constant, Predicate, UnOp, ValueId};

/// Walks one function body.
pub(crate) struct Lowerer {
    pub(crate) builder: FunctionBuilder,
    pub(crate) scope: LowerScope,
}

/// Resolved type of a checked node.
pub(crate) fn resolved(expr: &Expr, what: &'static str) -> Result<Type, LowerError> {
    match expr.ty {
        Some(ty) if !ty.is_error() => Ok(ty),
        _ => Err(LowerError::MissingType {
            what,
            span: expr.span,
        }),
    }
}

impl Lowerer {
    pub(crate) fn new() -> Self {
        Self {
            builder: FunctionBuilder::new(),
            scope: LowerScope::new(),
        }
    }

    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Result<ValueId, LowerError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr))
    }

    fn lower_expr_inner(&mut self, expr: &Expr) -> Result<ValueId, LowerError> {
        let ty = resolved(expr, "expression")?;
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(value) => {
                let constant = match ty {
                    Type::I32 => i32::try_from(*value).map(Constant::I32).map_err(|_| {
                        LowerError::Mistyped {
                            what: "integer literal",
                            ty,
                            span,
                        }
                    })?,
                    Type::I64 => Constant::I64(*value),
                    _ => {
                        return Err(LowerError::Mistyped {
                            what: "integer literal",
                            ty,
                            span,
                        })
                    }
                };
                Ok(self.builder.emit_const(constant))
            }
            ExprKind::Float(bits) => {
                let constant = match ty {
                    Type::F64 => Constant::F64(*bits),
                    Type::F32 => Constant::F32(narrow_float(*bits)),
                    _ => {
                        return Err(LowerError::Mistyped {
                            what: "float literal",
                            ty,
                            span,
                        })
                    }
                };
                Ok(self.builder.emit_const(constant))
            }
            ExprKind::Bool(value) => Ok(self.builder.emit_const(Constant::Bool(*value))),
            ExprKind::Ident(name) => self.local(name, span),
            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right, span),
            ExprKind::Unary { op, operand } => self.lower_unary(*op, operand, ty, span),
            ExprKind::Call { callee, args, .. } => {
                let args = args
                    .iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.builder.emit_call(ty, callee.clone(), args))
            }
            ExprKind::Convert(operand) => {
                let from = resolved(operand, "conversion operand")?;
                let value = self.lower_expr(operand)?;
                if from == ty {
                    return Ok(value);
                }
                let op = ConvOp::between(from, ty).ok_or(LowerError::Conversion {
                    from,
                    to: ty,
                    span,
                })?;
                Ok(self.builder.emit_convert(op, from, ty, value))
            }
            ExprKind::If(if_expr) => self.lower_if(if_expr, ty),
            ExprKind::For(for_expr) => self.lower_for(for_expr, span),
            ExprKind::Var(var_expr) => self.lower_var(var_expr),
            ExprKind::Assign { target, value, .. } => self.lower_assign(target, value, span),
            // Only allowed in tail position, where the value already flows
            // into the function's `ret`.
            ExprKind::Return(value) => self.lower_expr(value),
        }
    }

    /// Current value of a local.
    pub(crate) fn local(&self, name: &Name, span: Span) -> Result<ValueId, LowerError> {
        self.scope
            .lookup(name.as_str())
            .ok_or_else(|| LowerError::Unresolved {
                name: name.clone(),
                span,
            })
    }

    pub(crate) fn emit_unit(&mut self) -> ValueId {
        self.builder.emit_const(Constant::Unit)
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<ValueId, LowerError> {
        // The checker converted both operands to one type.
        let operand_ty = resolved(left, "binary operand")?;
        let lhs = self.lower_expr(left)?;
        let rhs = self.lower_expr(right)?;
        let opcode = binary_opcode(op, operand_ty).ok_or(LowerError::Mistyped {
            what: binary_what(op),
            ty: operand_ty,
            span,
        })?;
        Ok(self.builder.emit_binary(opcode, operand_ty, lhs, rhs))
    }

    fn lower_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        ty: Type,
        span: Span,
    ) -> Result<ValueId, LowerError> {
        let value = self.lower_expr(operand)?;
        let opcode = match op {
            UnaryOp::Neg if ty.is_integer() => UnOp::INeg,
            UnaryOp::Neg if ty.is_float() => UnOp::FNeg,
            UnaryOp::Not if ty == Type::Bool => UnOp::Not,
            UnaryOp::Neg | UnaryOp::Not => {
                return Err(LowerError::Mistyped {
                    what: "unary operation",
                    ty,
                    span,
                })
            }
        };
        Ok(self.builder.emit_unary(opcode, ty, value))
    }
}

/// Opcode for `op` on operands of type `ty`.
pub(crate) fn binary_opcode(op: BinaryOp, ty: Type) -> Option<BinOp> {
    if let Some(pred) = predicate(op) {
        return if ty.is_float() {
            Some(BinOp::FCmp(pred))
        } else if ty.is_integer() || (ty == Type::Bool && op.is_equality()) {
            Some(BinOp::ICmp(pred))
        } else {
            None
        };
    }
    let opcode = match (op, ty.is_integer(), ty.is_float()) {
        (BinaryOp::Add, true, _) => BinOp::IAdd,
        (BinaryOp::Sub, true, _) => BinOp::ISub,
        (BinaryOp::Mul, true, _) => BinOp::IMul,
        (BinaryOp::Div, true, _) => BinOp::SDiv,
        (BinaryOp::Add, _, true) => BinOp::FAdd,
        (BinaryOp::Sub, _, true) => BinOp::FSub,
        (BinaryOp::Mul, _, true) => BinOp::FMul,
        (BinaryOp::Div, _, true) => BinOp::FDiv,
        _ => return None,
    };
    Some(opcode)
}

fn predicate(op: BinaryOp) -> Option<Predicate> {
    match op {
        BinaryOp::Eq => Some(Predicate::Eq),
        BinaryOp::NotEq => Some(Predicate::Ne),
        BinaryOp::Lt => Some(Predicate::Lt),
        BinaryOp::Gt => Some(Predicate::Gt),
        BinaryOp::LtEq => Some(Predicate::Le),
        BinaryOp::GtEq => Some(Predicate::Ge),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Assign => None,
    }
}

fn binary_what(op: BinaryOp) -> &'static str {
    if op == BinaryOp::Assign {
        "assignment operator"
    } else {
        "binary operation"
    }
}

/// `f64` literal bits as `f32` bits.
#[expect(
    clippy::cast_possible_truncation,
    reason = "f32 literals are written as f64 and narrowed on purpose"
)]
fn narrow_float(bits: u64) -> u32 {
    (f64::from_bits(bits) as f32).to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_opcode_follows_operand_type() {
        assert_eq!(binary_opcode(BinaryOp::Add, Type::I32), Some(BinOp::IAdd));
        assert_eq!(binary_opcode(BinaryOp::Div, Type::I64), Some(BinOp::SDiv));
        assert_eq!(binary_opcode(BinaryOp::Add, Type::F32), Some(BinOp::FAdd));
        assert_eq!(
            binary_opcode(BinaryOp::LtEq, Type::F64),
            Some(BinOp::FCmp(Predicate::Le))
        );
        assert_eq!(
            binary_opcode(BinaryOp::Eq, Type::Bool),
            Some(BinOp::ICmp(Predicate::Eq))
        );
        assert_eq!(binary_opcode(BinaryOp::Lt, Type::Bool), None);
        assert_eq!(binary_opcode(BinaryOp::Add, Type::Bool), None);
        assert_eq!(binary_opcode(BinaryOp::Assign, Type::F64), None);
    }

    #[test]
    fn test_narrow_float() {
        assert_eq!(narrow_float(1.5f64.to_bits()), 1.5f32.to_bits());
    }
}
