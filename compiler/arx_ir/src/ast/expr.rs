//! Expression nodes.
//!
//! # Design Notes
//!
//! - Every node carries `ty: Option<Type>`. The parser leaves it `None`;
//!   the checker returns a new tree with every slot filled.
//! - Control-flow forms carry a [`ValueForm`] flag. Today the parser always
//!   produces [`ValueForm::Value`]; turning a form into a statement is a
//!   change to that flag and to the checker rule that reads it.
//! - Implicit conversions are explicit after checking: the checker wraps an
//!   operand in [`ExprKind::Convert`] whenever its type differs from the type
//!   the context needs.

use crate::{BinaryOp, Name, Span, Type, UnaryOp};

use super::item::ParsedType;

/// An expression with its source span and resolved-type slot.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Expr {
    /// Create an un-annotated expression.
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            ty: None,
        }
    }

    /// Create an expression with its type already resolved.
    #[inline]
    pub fn typed(kind: ExprKind, span: Span, ty: Type) -> Self {
        Expr {
            kind,
            span,
            ty: Some(ty),
        }
    }

    /// Value-producing flag of this node; plain expressions always produce
    /// a value.
    pub fn form(&self) -> ValueForm {
        match &self.kind {
            ExprKind::If(if_expr) => if_expr.form,
            ExprKind::For(for_expr) => for_expr.form,
            ExprKind::Var(var_expr) => var_expr.form,
            _ => ValueForm::Value,
        }
    }
}

/// Expression variants.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),
    /// Float literal stored as `f64` bits: `3.14`
    Float(u64),
    /// `true` / `false`
    Bool(bool),
    /// Variable reference.
    Ident(Name),
    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `op operand`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `callee(args...)`
    Call {
        callee: Name,
        callee_span: Span,
        args: Vec<Expr>,
    },
    /// `if cond then a else b`
    If(Box<IfExpr>),
    /// `for i = start, end, step in body`
    For(Box<ForExpr>),
    /// `var a = 1, b in body`
    Var(Box<VarExpr>),
    /// `target = value`
    Assign {
        target: Name,
        target_span: Span,
        value: Box<Expr>,
    },
    /// `return value`. Only valid where its value is the function's result,
    /// so it never changes control flow.
    Return(Box<Expr>),
    /// Conversion of `operand` to this node's type. Inserted by the checker
    /// for numeric widening and for numeric conditions (tested against zero).
    Convert(Box<Expr>),
}

/// Whether a control-flow form yields a value or is a statement.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ValueForm {
    /// Yields the value of the branch or iteration that ran last.
    #[default]
    Value,
    /// Yields nothing (`unit`); rejected where a value is expected.
    Statement,
}

#[derive(Clone, PartialEq, Debug)]
pub struct IfExpr {
    pub cond: Expr,
    pub then_branch: Expr,
    pub else_branch: Expr,
    pub form: ValueForm,
}

/// Counting loop. The body runs at least once; after each pass the
/// induction variable is stepped and `end` is evaluated with the stepped
/// value to decide whether to run again.
#[derive(Clone, PartialEq, Debug)]
pub struct ForExpr {
    pub var: Name,
    pub var_span: Span,
    pub var_ty: Option<ParsedType>,
    pub start: Expr,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: Expr,
    pub form: ValueForm,
}

#[derive(Clone, PartialEq, Debug)]
pub struct VarExpr {
    pub bindings: Vec<VarBinding>,
    pub body: Expr,
    pub form: ValueForm,
}

/// One `name [: type] [= init]` entry of a `var` expression.
#[derive(Clone, PartialEq, Debug)]
pub struct VarBinding {
    pub name: Name,
    pub span: Span,
    pub ty: Option<ParsedType>,
    pub init: Option<Expr>,
}
