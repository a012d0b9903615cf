//! Abstract syntax tree.
//!
//! The tree is a strict ownership hierarchy: a [`Module`] owns its items,
//! items own their prototypes and bodies, and expressions own their
//! children through `Box`/`Vec`. There is no sharing and no cycles.

mod display;
mod expr;
mod item;
mod operators;

pub use expr::{Expr, ExprKind, ForExpr, IfExpr, ValueForm, VarBinding, VarExpr};
pub use item::{Function, Item, Module, Param, ParsedType, Prototype};
pub use operators::{BinaryOp, UnaryOp};
