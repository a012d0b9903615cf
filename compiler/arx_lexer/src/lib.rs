//! Lexer for Arx.
//!
//! [`TokenStream`] turns source text into [`Token`]s lazily: each call to
//! `next()` scans exactly one token. The stream always ends with exactly one
//! `Eof` token, after which it is fused. [`TokenStream::restart`] rewinds it
//! to the beginning of the same source.
//!
//! # Errors
//!
//! The lexer never fails. Problems become `TokenKind::Error` tokens whose
//! span covers the offending text, and scanning continues after them:
//! - an unrecognized character yields one error token for that character
//! - a numeric run with several decimal points (`3.14.15`) yields one error
//!   token spanning the whole run
//! - an integer literal that does not fit `i64`, or a float literal that
//!   overflows to infinity, yields one error token

mod position;
mod raw;

use std::iter::FusedIterator;

use arx_ir::{LexErrorKind, Span, Token, TokenKind};
use logos::Logos;

use position::LineTracker;
use raw::RawToken;

/// Lazy, restartable token sequence over a source string.
pub struct TokenStream<'src> {
    source: &'src str,
    raw: logos::Lexer<'src, RawToken>,
    lines: LineTracker,
    finished: bool,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        TokenStream {
            source,
            raw: RawToken::lexer(source),
            lines: LineTracker::new(),
            finished: false,
        }
    }

    /// Rewind to the first token. Iterating again yields the same tokens.
    pub fn restart(&mut self) {
        *self = TokenStream::new(self.source);
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    fn make_token(&mut self, kind: TokenKind, range: std::ops::Range<usize>) -> Token {
        let pos = self.lines.position_at(self.source, range.start);
        Token::new(kind, to_span(range), pos)
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        loop {
            let Some(result) = self.raw.next() else {
                self.finished = true;
                let end = self.source.len();
                tracing::trace!(offset = end, "end of input");
                return Some(self.make_token(TokenKind::Eof, end..end));
            };
            let range = self.raw.span();
            let slice = self.raw.slice();

            let kind = match result {
                Ok(RawToken::LineComment) => continue,
                Ok(raw) => cook(raw, slice),
                Err(()) => {
                    let c = slice.chars().next().unwrap_or('\u{FFFD}');
                    TokenKind::Error(LexErrorKind::UnrecognizedChar(c))
                }
            };
            if let TokenKind::Error(error) = &kind {
                tracing::debug!(?error, ?range, "lexical error");
            }
            return Some(self.make_token(kind, range));
        }
    }
}

impl FusedIterator for TokenStream<'_> {}

/// Lex a whole source string, `Eof` included.
pub fn lex(source: &str) -> Vec<Token> {
    TokenStream::new(source).collect()
}

fn to_span(range: std::ops::Range<usize>) -> Span {
    Span::try_from_range(range).unwrap_or(Span::point(u32::MAX))
}

/// Convert a raw token to a `TokenKind`.
fn cook(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Word => {
            TokenKind::keyword(slice).unwrap_or_else(|| TokenKind::Ident(slice.into()))
        }
        RawToken::Number => cook_number(slice),
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        // Filtered out by the caller.
        RawToken::LineComment => TokenKind::Error(LexErrorKind::UnrecognizedChar('#')),
    }
}

/// Validate a digits-and-dots run: no dot is an integer, one dot a float.
fn cook_number(slice: &str) -> TokenKind {
    match memchr::memchr_iter(b'.', slice.as_bytes()).count() {
        0 => match slice.parse::<i64>() {
            Ok(value) => TokenKind::Int(value),
            Err(_) => TokenKind::Error(LexErrorKind::IntegerOverflow),
        },
        1 => match slice.parse::<f64>() {
            Ok(value) if value.is_finite() => TokenKind::float(value),
            Ok(_) => TokenKind::Error(LexErrorKind::FloatOverflow),
            Err(_) => TokenKind::Error(LexErrorKind::MalformedNumber),
        },
        _ => TokenKind::Error(LexErrorKind::MalformedNumber),
    }
}

#[cfg(test)]
mod tests;
