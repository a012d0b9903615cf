//! Arx Compiler Driver
//!
//! Runs the pipeline over one source text and turns the result into
//! something a person can read.
//!
//! # Architecture
//!
//! ```text
//! source text
//!     │
//!     ▼
//! arx_lexer::lex ──► Vec<Token>
//!     │
//!     ▼
//! arx_parse::parse ──► ParseOutput        (stop on E0xxx / E1xxx)
//!     │
//!     ▼
//! arx_types::check_module ──► annotated AST  (stop on E2xxx)
//!     │
//!     ▼
//! arx_lower::lower_module ──► ir::Module     (E9xxx is fatal)
//! ```
//!
//! A [`Session`] owns the [`CompileOptions`] and runs these stages. It is
//! the only place that reads files or writes to a terminal; the stages
//! themselves only emit `tracing` events.

pub mod cli;
mod error;
mod session;
pub mod tracing_setup;

pub use error::DriverError;
pub use session::{CompileOptions, CompileOutput, Session, Stage};
