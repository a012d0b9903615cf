//! Recursive descent parser for Arx.
//!
//! Binary expressions use precedence climbing over the table in
//! [`arx_ir::BinaryOp::precedence`]; everything else is plain recursive
//! descent. A failed item is reported and skipped up to the next `def`,
//! `extern`, `;` or end of input, so one pass collects every error.

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use error::{lex_error_code, ParseError};
pub use recovery::{TokenSet, BINARY_OPS, EXPR_START, ITEM_BOUNDARY};

use arx_diagnostic::{Diagnostic, ErrorCode};
use arx_ir::{Module, Token, TokenKind};
use tracing::debug;

use cursor::Cursor;
use recovery::synchronize;

/// Name given to the first top-level expression; later ones get `.1`,
/// `.2`, ... appended.
pub const ANON_EXPR_NAME: &str = "__anon_expr";

/// Result of parsing a module.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub module: Module,
    /// In source order.
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(ParseError::to_diagnostic).collect()
    }
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    anon_count: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            anon_count: 0,
        }
    }

    /// Name for the next top-level expression.
    fn next_anon_name(&mut self) -> String {
        let name = match self.anon_count {
            0 => ANON_EXPR_NAME.to_string(),
            n => format!("{ANON_EXPR_NAME}.{n}"),
        };
        self.anon_count += 1;
        name
    }

    /// A lexical error token that makes up a whole `;`-terminated item is
    /// reported on its own and skipped.
    fn stray_lexical_error(&mut self) -> Option<ParseError> {
        let &TokenKind::Error(kind) = self.cursor.current_kind() else {
            return None;
        };
        if self.cursor.peek_tag() != arx_ir::TokenTag::Semicolon {
            return None;
        }
        let span = self.cursor.advance().span;
        Some(ParseError::standalone_lexical(kind, span))
    }

    fn parse_module(mut self) -> ParseOutput {
        let mut module = Module::default();
        let mut errors = Vec::new();

        loop {
            if self.cursor.is_at_end() {
                break;
            }
            if self.cursor.eat(arx_ir::TokenTag::Semicolon) {
                continue;
            }
            if let Some(error) = self.stray_lexical_error() {
                debug!(code = %error.code, span = ?error.span, "{}", error.message);
                errors.push(error);
                continue;
            }

            let start = self.cursor.position();
            match self.parse_item() {
                Ok(item) => {
                    tracing::trace!(name = %item.proto().name, "parsed item");
                    module.items.push(item);
                }
                Err(error) => {
                    debug!(code = %error.code, span = ?error.span, "{}", error.message);
                    let reported = (error.code == ErrorCode::E1005).then_some(error.span);
                    errors.push(error);
                    synchronize(&mut self.cursor, ITEM_BOUNDARY, reported, &mut errors);
                    if self.cursor.position() == start && !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                }
            }
        }

        ParseOutput { module, errors }
    }
}

/// Parse a token sequence. A trailing `Eof` is supplied if missing.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> ParseOutput {
    if tokens.last().is_some_and(Token::is_eof) {
        return Parser::new(tokens).parse_module();
    }

    let end = tokens.last().map_or(0, |token| token.span.end);
    let mut owned = tokens.to_vec();
    owned.push(Token::new(
        TokenKind::Eof,
        arx_ir::Span::point(end),
        tokens.last().map(|token| token.pos).unwrap_or_default(),
    ));
    Parser::new(&owned).parse_module()
}

/// Lex and parse source text.
pub fn parse_source(source: &str) -> ParseOutput {
    let tokens = arx_lexer::lex(source);
    parse(&tokens)
}
