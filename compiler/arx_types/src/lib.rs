//! Name resolution and type checking for Arx.
//!
//! [`check_module`] takes a parsed [`arx_ir::Module`] and returns a new
//! module in which every expression carries its type, every parameter and
//! prototype carries its resolved type, and every implicit numeric widening
//! or numeric condition is an explicit `Convert` node. Lowering reads these
//! annotations and never re-derives a type.
//!
//! Functions may be called before their definition: all signatures are
//! declared before any body is checked.

mod check;
mod env;
mod error;
mod suggest;
mod widen;

pub use check::{check_module, TypeCheckOutput};
pub use env::{Scope, Symbol, SymbolKind};
pub use error::SemanticError;
pub use suggest::{closest, edit_distance, similarity_threshold};
pub use widen::{can_widen, common_type, rank};
