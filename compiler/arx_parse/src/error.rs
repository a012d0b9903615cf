//! Parse errors.
//!
//! A [`ParseError`] records what the parser saw (`found`) and which token
//! kinds it would have accepted (`expected`), so the rendered message reads
//! "expected one of `a`, `b`, found `c`".

use arx_diagnostic::{Diagnostic, ErrorCode};
use arx_ir::{BinaryOp, LexErrorKind, Span, TokenKind};

use crate::recovery::{describe_found, TokenSet, EXPR_START};

/// Parse error.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// The token at `span`.
    pub found: TokenKind,
    /// Token kinds that would have been accepted at `span`.
    pub expected: TokenSet,
    /// Label text for the primary span.
    pub context: Option<String>,
    /// Where the delimiter left open by an `E1003` was opened.
    pub opened_at: Option<Span>,
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span, found: TokenKind) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            found,
            expected: TokenSet::new(),
            context: None,
            opened_at: None,
            help: Vec::new(),
        }
    }

    /// `E1001`: the current token is not one of `expected`.
    #[cold]
    pub fn unexpected(found: &TokenKind, span: Span, expected: TokenSet) -> Self {
        let message = format!("expected {}, found {}", expected.describe(), describe_found(found));
        ParseError {
            expected,
            ..ParseError::new(ErrorCode::E1001, message, span, found.clone())
        }
        .with_context("unexpected token")
    }

    /// `E1002`: an expression was required. `after` names the operator
    /// whose right operand is missing.
    #[cold]
    pub fn expected_expression(found: &TokenKind, span: Span, after: Option<BinaryOp>) -> Self {
        let message = match after {
            Some(op) => format!(
                "expected operand after `{}`, found {}",
                op.as_symbol(),
                describe_found(found)
            ),
            None => format!("expected expression, found {}", describe_found(found)),
        };
        ParseError {
            expected: EXPR_START,
            ..ParseError::new(ErrorCode::E1002, message, span, found.clone())
        }
        .with_context("expected expression here")
    }

    /// `E1003`: input ended, or a new item began, before the `)` opened at
    /// `open`.
    #[cold]
    pub fn unclosed_paren(found: &TokenKind, span: Span, open: Span, expected: TokenSet) -> Self {
        ParseError {
            expected,
            opened_at: Some(open),
            ..ParseError::new(
                ErrorCode::E1003,
                format!("unclosed delimiter `(`, found {}", describe_found(found)),
                span,
                found.clone(),
            )
        }
        .with_context("expected `)`")
    }

    /// `E1004`.
    #[cold]
    pub fn expected_ident(found: &TokenKind, span: Span) -> Self {
        ParseError {
            expected: TokenSet::single(arx_ir::TokenTag::Ident),
            ..ParseError::new(
                ErrorCode::E1004,
                format!("expected identifier, found {}", describe_found(found)),
                span,
                found.clone(),
            )
        }
        .with_context("expected identifier")
    }

    /// `E1005`: a lexical error token in the way of the parse.
    #[cold]
    pub fn lexical(kind: LexErrorKind, span: Span) -> Self {
        ParseError::new(ErrorCode::E1005, kind.message(), span, TokenKind::Error(kind))
            .with_context("invalid token")
            .with_help(format!(
                "lexical error {}: {}",
                lex_error_code(kind),
                lex_error_code(kind).description()
            ))
    }

    /// A lexical error token that nothing was trying to parse, reported
    /// under its own `E0xxx` code.
    #[cold]
    pub fn standalone_lexical(kind: LexErrorKind, span: Span) -> Self {
        ParseError::new(lex_error_code(kind), kind.message(), span, TokenKind::Error(kind))
            .with_context("invalid token")
    }

    /// `E1006`: the left side of `=` is not a plain name.
    #[cold]
    pub fn invalid_assignment_target(span: Span, found: TokenKind) -> Self {
        ParseError::new(
            ErrorCode::E1006,
            "invalid assignment target",
            span,
            found,
        )
        .with_context("cannot assign to this expression")
        .with_help("only a variable name can appear on the left of `=`")
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Convert to a full Diagnostic for rich error reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));

        if let Some(open) = self.opened_at {
            diag = diag.with_secondary_label(open, "unclosed delimiter opened here");
        }

        for help in &self.help {
            diag = diag.with_note(help);
        }

        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Lexical error code behind an error token.
pub fn lex_error_code(kind: LexErrorKind) -> ErrorCode {
    match kind {
        LexErrorKind::UnrecognizedChar(_) => ErrorCode::E0001,
        LexErrorKind::MalformedNumber => ErrorCode::E0002,
        LexErrorKind::IntegerOverflow | LexErrorKind::FloatOverflow => ErrorCode::E0003,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_ir::TokenTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unexpected_message_lists_expected() {
        let expected = TokenSet::single(TokenTag::RParen).with(TokenTag::Comma);
        let error = ParseError::unexpected(&TokenKind::Semicolon, Span::new(5, 6), expected);
        assert_eq!(error.code, ErrorCode::E1001);
        assert_eq!(error.message, "expected `)` or `,`, found `;`");
    }

    #[test]
    fn test_expected_operand_names_operator() {
        let error = ParseError::expected_expression(
            &TokenKind::Semicolon,
            Span::new(3, 4),
            Some(BinaryOp::Add),
        );
        assert_eq!(error.message, "expected operand after `+`, found `;`");
        assert!(error.expected.contains(TokenTag::Int));
    }

    #[test]
    fn test_lexical_error_diagnostic() {
        let error = ParseError::lexical(LexErrorKind::MalformedNumber, Span::new(0, 7));
        let diag = error.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1005);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 7)));
        assert_eq!(
            diag.notes,
            vec!["lexical error E0002: malformed numeric literal".to_string()]
        );
    }

    #[test]
    fn test_standalone_lexical_error_keeps_its_code() {
        let error =
            ParseError::standalone_lexical(LexErrorKind::UnrecognizedChar('$'), Span::new(3, 4));
        let diag = error.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0001);
        assert_eq!(diag.code.category(), arx_diagnostic::Category::Lexical);
        assert_eq!(diag.message, "unrecognized character `$`");
        assert!(diag.notes.is_empty());
    }

    #[test]
    fn test_unclosed_paren_has_secondary_label() {
        let error = ParseError::unclosed_paren(
            &TokenKind::Eof,
            Span::point(9),
            Span::new(3, 4),
            TokenSet::single(TokenTag::RParen),
        );
        let diag = error.to_diagnostic();
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(error.message, "unclosed delimiter `(`, found end of input");
    }
}
