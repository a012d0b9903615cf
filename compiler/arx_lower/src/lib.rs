//! IR lowering for Arx.
//!
//! Takes a module that passed semantic analysis and produces a
//! basic-block [`ir::Module`]:
//!
//! - **Typed opcodes**: every literal, operation and conversion lowers to the
//!   instruction for the type the checker resolved. Nothing is inferred here.
//! - **SSA**: each value is defined once and numbered in order. Assignment
//!   rebinds a name; merge points take block parameters.
//! - **Verified**: each function is checked by [`verify_function`] before it
//!   is returned.
//!
//! Every failure is an internal error ([`LowerError`]).

mod error;
pub mod ir;
mod lower;
mod print;
mod verify;

pub use error::LowerError;
pub use lower::{lower_function, lower_module};
pub use verify::verify_function;
