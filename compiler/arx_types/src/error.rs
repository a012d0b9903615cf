//! Semantic errors.
//!
//! One constructor per error code. Each error carries the primary span,
//! optional secondary spans (e.g. where a duplicate was first declared),
//! notes, and suggestions.

use arx_diagnostic::{Diagnostic, ErrorCode};
use arx_ir::{BinaryOp, Name, Span, Type, UnaryOp};

/// Semantic error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SemanticError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Label text at `span`.
    pub label: String,
    pub related: Vec<(Span, String)>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl SemanticError {
    #[cold]
    fn new(code: ErrorCode, message: String, span: Span, label: impl Into<String>) -> Self {
        SemanticError {
            code,
            message,
            span,
            label: label.into(),
            related: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    fn with_related(mut self, span: Span, text: impl Into<String>) -> Self {
        self.related.push((span, text.into()));
        self
    }

    #[must_use]
    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// `E2001`: a value of type `found` where `expected` is required.
    #[cold]
    pub fn mismatch(span: Span, expected: Type, found: Type, context: &str) -> Self {
        SemanticError::new(
            ErrorCode::E2001,
            format!("type mismatch: expected `{expected}`, found `{found}`"),
            span,
            context,
        )
    }

    /// `E2001`: operands a binary operator cannot combine.
    #[cold]
    pub fn binary_operands(span: Span, op: BinaryOp, left: Type, right: Type) -> Self {
        let wanted = if op.is_equality() {
            "two numbers or two booleans"
        } else {
            "numeric operands"
        };
        SemanticError::new(
            ErrorCode::E2001,
            format!(
                "type mismatch: `{}` expects {wanted}, found `{left}` and `{right}`",
                op.as_symbol()
            ),
            span,
            format!("`{left}` {} `{right}`", op.as_symbol()),
        )
    }

    /// `E2001`: `if` branches with no common type.
    #[cold]
    pub fn branch_mismatch(span: Span, then_ty: Type, else_ty: Type, then_span: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2001,
            format!("type mismatch: `if` branches have types `{then_ty}` and `{else_ty}`"),
            span,
            format!("this is `{else_ty}`"),
        )
        .with_related(then_span, format!("this is `{then_ty}`"))
        .with_note("branches must widen to a common type")
    }

    /// `E2001`: a function name used where a value is required.
    #[cold]
    pub fn function_as_value(span: Span, name: &Name) -> Self {
        SemanticError::new(
            ErrorCode::E2001,
            format!("type mismatch: `{name}` is a function, not a value"),
            span,
            "expected a value",
        )
        .with_suggestion(format!("call it: `{name}(...)`"))
    }

    /// `E2002`.
    #[cold]
    pub fn unary_operand(span: Span, op: UnaryOp, operand: Type) -> Self {
        let wanted = match op {
            UnaryOp::Neg => "a numeric operand",
            UnaryOp::Not => "a `bool` or numeric operand",
        };
        SemanticError::new(
            ErrorCode::E2002,
            format!(
                "operator `{}` cannot be applied to `{operand}`",
                op.as_symbol()
            ),
            span,
            format!("expects {wanted}"),
        )
    }

    /// `E2003`.
    #[cold]
    pub fn unknown_identifier(span: Span, name: &str, similar: &[Name]) -> Self {
        let mut error = SemanticError::new(
            ErrorCode::E2003,
            format!("unknown identifier `{name}`"),
            span,
            "not found in this scope",
        );
        if let Some(first) = similar.first() {
            error = error.with_suggestion(format!("did you mean `{first}`?"));
        }
        error
    }

    /// `E2003`: a call to a function that was never declared.
    #[cold]
    pub fn unknown_function(span: Span, name: &str, similar: &[Name]) -> Self {
        let mut error = SemanticError::new(
            ErrorCode::E2003,
            format!("unknown function `{name}`"),
            span,
            "no `def` or `extern` with this name",
        );
        if let Some(first) = similar.first() {
            error = error.with_suggestion(format!("did you mean `{first}`?"));
        }
        error
    }

    /// `E2004`.
    #[cold]
    pub fn arity(span: Span, callee: &Name, expected: usize, found: usize, decl: Span) -> Self {
        let suggestion = if found > expected {
            let extra = found - expected;
            format!("remove {extra} extra argument{}", plural(extra))
        } else {
            let missing = expected - found;
            format!("add {missing} missing argument{}", plural(missing))
        };
        SemanticError::new(
            ErrorCode::E2004,
            format!(
                "`{callee}` takes {expected} argument{} but {found} {} supplied",
                plural(expected),
                if found == 1 { "was" } else { "were" }
            ),
            span,
            format!("expected {expected} argument{}", plural(expected)),
        )
        .with_related(decl, "declared here")
        .with_suggestion(suggestion)
    }

    /// `E2005`.
    #[cold]
    pub fn return_mismatch(span: Span, name: &Name, declared: Type, found: Type) -> Self {
        SemanticError::new(
            ErrorCode::E2005,
            format!("`{name}` returns `{declared}` but its body has type `{found}`"),
            span,
            format!("this is `{found}`"),
        )
        .with_note(format!("`{found}` does not widen to `{declared}`"))
    }

    /// `E2006`.
    #[cold]
    pub fn duplicate(span: Span, name: &Name, what: &str, first: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2006,
            format!("duplicate {what} `{name}`"),
            span,
            "declared again here",
        )
        .with_related(first, "first declared here")
    }

    /// `E2007`.
    #[cold]
    pub fn statement_as_value(span: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2007,
            "statement used as a value".to_string(),
            span,
            "this produces no value",
        )
    }

    /// `E2008`.
    #[cold]
    pub fn unknown_type(span: Span, name: &str, similar: Option<&str>) -> Self {
        let mut error = SemanticError::new(
            ErrorCode::E2008,
            format!("unknown type `{name}`"),
            span,
            "not a type",
        )
        .with_note(format!("known types are {}", known_types()));
        if let Some(similar) = similar {
            error = error.with_suggestion(format!("did you mean `{similar}`?"));
        }
        error
    }

    /// `E2009`: assignment to something that is not a local.
    #[cold]
    pub fn invalid_assignment(span: Span, name: &Name, kind: &str, decl: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2009,
            format!("cannot assign to {kind} `{name}`"),
            span,
            "only parameters, loop variables and `var` bindings can be assigned",
        )
        .with_related(decl, format!("`{name}` declared here"))
    }

    /// `E2010`.
    #[cold]
    pub fn not_a_function(span: Span, name: &Name, kind: &str, decl: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2010,
            format!("`{name}` is not a function"),
            span,
            "called here",
        )
        .with_related(decl, format!("`{name}` is a {kind}"))
    }

    /// `E2011`: `return` somewhere other than the function's result.
    #[cold]
    pub fn misplaced_return(span: Span) -> Self {
        SemanticError::new(
            ErrorCode::E2011,
            "`return` outside tail position".to_string(),
            span,
            "computation would continue after this `return`",
        )
        .with_note("`return` may only produce the function's final value")
    }

    /// Convert to a full Diagnostic for rich error reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, &self.label);
        for (span, text) in &self.related {
            diag = diag.with_secondary_label(*span, text);
        }
        for note in &self.notes {
            diag = diag.with_note(note);
        }
        for suggestion in &self.suggestions {
            diag = diag.with_suggestion(suggestion);
        }
        diag
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn known_types() -> String {
    Type::NAMES
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
