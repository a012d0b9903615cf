//! Operator Matching Helpers

use arx_ir::{BinaryOp, TokenKind, UnaryOp};

use crate::recovery::BINARY_OPS;
use crate::Parser;

impl Parser<'_> {
    /// Binary operator at the current token. Records every binary operator
    /// as acceptable here, since any of them could continue the expression.
    pub(crate) fn match_binary_op(&self) -> Option<BinaryOp> {
        self.cursor.note_expected(BINARY_OPS);
        let op = match self.cursor.current_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Eq => BinaryOp::Assign,
            _ => return None,
        };
        Some(op)
    }

    pub(crate) fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }
}
