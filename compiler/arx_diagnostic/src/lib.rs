//! Diagnostic system for Arx compiler errors.
//!
//! Every phase reports problems through the same [`Diagnostic`] value:
//! - an [`ErrorCode`] for searchability (its first digit names the phase)
//! - a message saying what went wrong
//! - labeled spans saying where
//! - notes and suggestions saying why and how to fix it
//!
//! Phases never print. They hand diagnostics to the driver, which renders
//! them with an [`emitter::DiagnosticEmitter`].

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{Category, ErrorCode};
