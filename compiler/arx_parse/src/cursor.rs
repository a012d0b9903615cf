//! Token cursor for navigating the token stream.
//!
//! Besides lookahead and consumption, the cursor remembers every token kind
//! the grammar tested for at the current position. When a rule fails, that
//! set becomes the "expected one of ..." part of the error. Consuming a
//! token clears it.

use std::cell::Cell;

use arx_ir::{Name, Span, Token, TokenKind, TokenTag};

use crate::recovery::TokenSet;
use crate::ParseError;

/// Cursor over an `Eof`-terminated token slice.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    expected: Cell<TokenSet>,
}

impl<'a> Cursor<'a> {
    /// The slice must be non-empty and end with `Eof`.
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(tokens.last().is_some_and(Token::is_eof));
        Cursor {
            tokens,
            pos: 0,
            expected: Cell::new(TokenSet::new()),
        }
    }

    /// Index of the current token; used to detect lack of progress.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Invariant: `pos` is always in bounds and the last token is `Eof`.
    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn current_tag(&self) -> TokenTag {
        self.current().tag()
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Tag of the token after the current one; `Eof` past the end.
    #[inline]
    pub(crate) fn peek_tag(&self) -> TokenTag {
        self.tokens.get(self.pos + 1).map_or(TokenTag::Eof, Token::tag)
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// Test the current token, recording `tag` as acceptable here.
    #[inline]
    pub(crate) fn check(&self, tag: TokenTag) -> bool {
        self.note_expected(TokenSet::single(tag));
        self.current_tag() == tag
    }

    /// Record `set` as acceptable at the current position.
    #[inline]
    pub(crate) fn note_expected(&self, set: TokenSet) {
        self.expected.set(self.expected.get().union(set));
    }

    /// Consume the current token if it has `tag`.
    pub(crate) fn eat(&mut self, tag: TokenTag) -> bool {
        if self.check(tag) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance to the next token and return the consumed one. `Eof` is
    /// never consumed: at the end the cursor stays put.
    pub(crate) fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !token.is_eof() {
            self.pos += 1;
            self.expected.set(TokenSet::new());
        }
        token
    }

    /// Consume a token of kind `tag` or fail with `E1001`.
    pub(crate) fn expect(&mut self, tag: TokenTag) -> Result<Span, ParseError> {
        if self.check(tag) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected())
        }
    }

    /// Consume an identifier or fail with `E1004`.
    pub(crate) fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok((name.clone(), span))
        } else {
            Err(self.lexical_error().unwrap_or_else(|| {
                ParseError::expected_ident(self.current_kind(), self.current_span())
            }))
        }
    }

    /// `E1001` at the current token with everything tested here as the
    /// expected set.
    #[cold]
    pub(crate) fn unexpected(&self) -> ParseError {
        self.lexical_error().unwrap_or_else(|| {
            ParseError::unexpected(
                self.current_kind(),
                self.current_span(),
                self.expected.get(),
            )
        })
    }

    /// `E1005` when the current token is a lexical error token. Such a token
    /// is never accepted by any rule, so every failure on it reports the
    /// lexical problem instead of a generic one.
    pub(crate) fn lexical_error(&self) -> Option<ParseError> {
        match self.current_kind() {
            TokenKind::Error(kind) => Some(ParseError::lexical(*kind, self.current_span())),
            _ => None,
        }
    }

    /// Accumulated expected set, for errors built outside the cursor.
    pub(crate) fn expected(&self) -> TokenSet {
        self.expected.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_diagnostic::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cursor_navigation() {
        let tokens = arx_lexer::lex("def f(x)");
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor.check(TokenTag::KwDef));
        cursor.advance();
        assert_eq!(cursor.expect_ident().map(|(name, _)| name), Ok(Name::new("f")));
        assert!(cursor.eat(TokenTag::LParen));
        assert!(!cursor.eat(TokenTag::RParen));
        cursor.advance();
        assert!(cursor.eat(TokenTag::RParen));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = arx_lexer::lex("x");
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        let at_end = cursor.position();
        assert!(cursor.advance().is_eof());
        assert!(cursor.advance().is_eof());
        assert_eq!(cursor.position(), at_end);
    }

    #[test]
    fn test_expected_set_accumulates_until_advance() {
        let tokens = arx_lexer::lex("x ;");
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        assert!(!cursor.check(TokenTag::Comma));
        assert!(!cursor.check(TokenTag::RParen));

        let error = cursor.unexpected();
        assert_eq!(error.code, ErrorCode::E1001);
        assert_eq!(error.message, "expected `)` or `,`, found `;`");

        cursor.advance();
        assert!(cursor.expected().is_empty());
    }

    #[test]
    fn test_failure_on_error_token_is_lexical() {
        let tokens = arx_lexer::lex("$");
        let mut cursor = Cursor::new(&tokens);
        let error = cursor.expect(TokenTag::LParen).err();
        assert_eq!(error.map(|e| e.code), Some(ErrorCode::E1005));
        let error = cursor.expect_ident().err();
        assert_eq!(error.map(|e| e.code), Some(ErrorCode::E1005));
    }
}
