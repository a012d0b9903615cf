//! Internal lowering errors.
//!
//! Lowering runs only on modules that checked cleanly, so every error here
//! is a compiler bug: either analysis left a gap (`E9001`) or the emitted
//! IR failed verification (`E9002`). None of them is downgraded.

use arx_diagnostic::{Diagnostic, ErrorCode};
use arx_ir::{Name, Span, Type};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LowerError {
    /// A type slot the checker should have filled is empty or `Error`.
    #[error("{what} has no resolved type")]
    MissingType { what: &'static str, span: Span },

    /// A node carries a type its construct cannot have.
    #[error("{what} has type `{ty}` after analysis")]
    Mistyped {
        what: &'static str,
        ty: Type,
        span: Span,
    },

    /// A name that analysis accepted but lowering cannot find.
    #[error("`{name}` is not bound during lowering")]
    Unresolved { name: Name, span: Span },

    /// A `Convert` node between types with no conversion opcode.
    #[error("no conversion from `{from}` to `{to}`")]
    Conversion { from: Type, to: Type, span: Span },

    /// The lowered function failed verification.
    #[error("malformed IR in `{function}`: {detail}")]
    Malformed { function: Name, detail: String },
}

impl LowerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LowerError::MissingType { .. }
            | LowerError::Mistyped { .. }
            | LowerError::Unresolved { .. }
            | LowerError::Conversion { .. } => ErrorCode::E9001,
            LowerError::Malformed { .. } => ErrorCode::E9002,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            LowerError::MissingType { span, .. }
            | LowerError::Mistyped { span, .. }
            | LowerError::Unresolved { span, .. }
            | LowerError::Conversion { span, .. } => Some(*span),
            LowerError::Malformed { .. } => None,
        }
    }

    pub(crate) fn malformed(function: &Name, detail: impl Into<String>) -> Self {
        LowerError::Malformed {
            function: function.clone(),
            detail: detail.into(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code())
            .with_message(format!("internal compiler error: {self}"))
            .with_note("this is a bug in the compiler, not in the program");
        if let Some(span) = self.span() {
            diag = diag.with_label(span, "while lowering this");
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_codes_by_kind() {
        let missing = LowerError::MissingType {
            what: "expression",
            span: Span::new(2, 5),
        };
        assert_eq!(missing.code(), ErrorCode::E9001);
        assert_eq!(missing.to_string(), "expression has no resolved type");

        let malformed = LowerError::malformed(&Name::new("f"), "bb1 has no terminator");
        assert_eq!(malformed.code(), ErrorCode::E9002);
        assert_eq!(
            malformed.to_string(),
            "malformed IR in `f`: bb1 has no terminator"
        );
    }

    #[test]
    fn test_diagnostic_is_internal() {
        let diag = LowerError::Conversion {
            from: Type::F64,
            to: Type::I32,
            span: Span::new(0, 3),
        }
        .to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E9001);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 3)));
        assert_eq!(
            diag.message,
            "internal compiler error: no conversion from `f64` to `i32`"
        );
    }
}
