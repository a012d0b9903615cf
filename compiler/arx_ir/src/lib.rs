//! Arx IR - Shared Compiler Data Structures
//!
//! This crate contains the data every phase of the Arx compiler agrees on:
//! - Spans and line/column positions for source locations
//! - Names for identifiers
//! - Tokens produced by the lexer
//! - AST nodes produced by the parser and annotated by the type checker
//! - The `Type` variant shared by the checker and the IR lowering
//!
//! # Design Philosophy
//!
//! - **Owned trees**: every AST node exclusively owns its children. Phases
//!   never mutate a tree produced by an earlier phase; they build a new one.
//! - **Bit-stored floats**: float literals are stored as `u64` bits so tokens
//!   and nodes can derive `Eq` and `Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod name;
mod span;
mod token;
mod ty;

pub use ast::{
    BinaryOp, Expr, ExprKind, ForExpr, Function, IfExpr, Item, Module, Param, ParsedType,
    Prototype, UnaryOp, ValueForm, VarBinding, VarExpr,
};
pub use name::Name;
pub use span::{Position, Span, SpanError};
pub use token::{LexErrorKind, Token, TokenKind, TokenTag};
pub use ty::Type;
