//! Expression parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: entry point (`parse_expr`), precedence climbing, unary
//! - `operators.rs`: operator matching helpers
//! - `primary.rs`: literals, names and calls, groups, `if`/`for`/`var`

mod operators;
mod primary;

use arx_ir::{BinaryOp, Expr, ExprKind, TokenKind};
use arx_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow on deeply
    /// nested expressions.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| {
            let lhs = self.parse_unary()?;
            self.parse_binary_rhs(BinaryOp::MIN_PRECEDENCE, lhs)
        })
    }

    /// Precedence climbing: fold operators binding at least `min_prec`
    /// onto `lhs`. An operator of equal precedence is folded here rather
    /// than in the recursive call, which makes every operator
    /// left-associative.
    fn parse_binary_rhs(&mut self, min_prec: u8, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            let Some(op) = self.match_binary_op() else {
                return Ok(lhs);
            };
            if op.precedence() < min_prec {
                return Ok(lhs);
            }
            self.cursor.advance();

            let mut rhs = self.parse_operand(op)?;
            if self
                .match_binary_op()
                .is_some_and(|next| next.precedence() > op.precedence())
            {
                rhs = ensure_sufficient_stack(|| self.parse_binary_rhs(op.precedence() + 1, rhs))?;
            }

            lhs = make_binary(op, lhs, rhs)?;
        }
    }

    /// Right operand of `op`.
    fn parse_operand(&mut self, op: BinaryOp) -> Result<Expr, ParseError> {
        if self.cursor.current_kind().can_start_expr() {
            return self.parse_unary();
        }
        Err(self.cursor.lexical_error().unwrap_or_else(|| {
            ParseError::expected_expression(
                self.cursor.current_kind(),
                self.cursor.current_span(),
                Some(op),
            )
        }))
    }

    /// `-x`, `!x`, or a primary expression.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_primary();
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }
}

/// Build `lhs op rhs`. Assignment becomes `ExprKind::Assign` and needs a
/// plain name on the left.
fn make_binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Result<Expr, ParseError> {
    let span = lhs.span.merge(rhs.span);
    if op != BinaryOp::Assign {
        return Ok(Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            },
            span,
        ));
    }

    match lhs.kind {
        ExprKind::Ident(target) => Ok(Expr::new(
            ExprKind::Assign {
                target,
                target_span: lhs.span,
                value: Box::new(rhs),
            },
            span,
        )),
        _ => Err(ParseError::invalid_assignment_target(
            lhs.span,
            TokenKind::Eq,
        )),
    }
}
