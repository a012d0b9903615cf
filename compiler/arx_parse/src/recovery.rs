//! Error recovery for the parser.
//!
//! Token sets with O(1) membership, plus resynchronization after a failed
//! item.

use arx_ir::{Span, TokenKind, TokenTag};

use crate::cursor::Cursor;
use crate::ParseError;

/// A set of token tags, one bit per [`TokenTag`] discriminant.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn single(tag: TokenTag) -> Self {
        Self(1u64 << tag as u8)
    }

    /// Add a tag to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, tag: TokenTag) -> Self {
        Self(self.0 | (1u64 << tag as u8))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, tag: TokenTag) -> bool {
        (self.0 & (1u64 << tag as u8)) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Members in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = TokenTag> {
        TokenTag::ALL.into_iter().filter(move |tag| self.contains(*tag))
    }

    /// Render as "`a`", "`a` or `b`", or "one of `a`, `b`, `c`".
    pub fn describe(self) -> String {
        let names: Vec<String> = self.iter().map(describe_tag).collect();
        match names.as_slice() {
            [] => "nothing".to_string(),
            [single] => single.clone(),
            [first, second] => format!("{first} or {second}"),
            many => format!("one of {}", many.join(", ")),
        }
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Token classes print as words, everything else as quoted source text.
pub(crate) fn describe_tag(tag: TokenTag) -> String {
    match tag {
        TokenTag::Int | TokenTag::Float | TokenTag::Ident | TokenTag::Error | TokenTag::Eof => {
            tag.display_name().to_string()
        }
        _ => format!("`{}`", tag.display_name()),
    }
}

/// Describe the token actually found, with its text where it has one.
pub(crate) fn describe_found(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Error(_) => "invalid token".to_string(),
        other => format!("`{other}`"),
    }
}

/// Tokens that may start a top-level item, or end one.
pub const ITEM_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenTag::KwDef)
    .with(TokenTag::KwExtern)
    .with(TokenTag::Semicolon)
    .with(TokenTag::Eof);

/// Tokens that may start an expression.
pub const EXPR_START: TokenSet = TokenSet::new()
    .with(TokenTag::Int)
    .with(TokenTag::Float)
    .with(TokenTag::Ident)
    .with(TokenTag::KwTrue)
    .with(TokenTag::KwFalse)
    .with(TokenTag::KwIf)
    .with(TokenTag::KwFor)
    .with(TokenTag::KwVar)
    .with(TokenTag::KwReturn)
    .with(TokenTag::LParen)
    .with(TokenTag::Minus)
    .with(TokenTag::Bang);

/// Every binary operator, assignment included.
pub const BINARY_OPS: TokenSet = TokenSet::new()
    .with(TokenTag::Plus)
    .with(TokenTag::Minus)
    .with(TokenTag::Star)
    .with(TokenTag::Slash)
    .with(TokenTag::Lt)
    .with(TokenTag::Gt)
    .with(TokenTag::LtEq)
    .with(TokenTag::GtEq)
    .with(TokenTag::EqEq)
    .with(TokenTag::NotEq)
    .with(TokenTag::Eq);

/// Advance until the current token is in `recovery` or at end of input.
///
/// Lexical error tokens skipped on the way are reported under their own
/// lexical codes, except one at `already_reported`, which the failed item
/// reported itself.
pub(crate) fn synchronize(
    cursor: &mut Cursor<'_>,
    recovery: TokenSet,
    already_reported: Option<Span>,
    errors: &mut Vec<ParseError>,
) {
    while !cursor.is_at_end() && !recovery.contains(cursor.current_tag()) {
        let token = cursor.advance();
        if let TokenKind::Error(kind) = token.kind {
            if already_reported != Some(token.span) {
                errors.push(ParseError::standalone_lexical(kind, token.span));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_set_empty() {
        let set = TokenSet::new();
        assert!(set.is_empty());
        assert_eq!(set.count(), 0);
        assert!(!set.contains(TokenTag::Eof));
    }

    #[test]
    fn test_token_set_with_and_union() {
        let set = TokenSet::single(TokenTag::Comma).with(TokenTag::RParen);
        assert_eq!(set.count(), 2);
        assert!(set.contains(TokenTag::Comma));
        assert!(!set.contains(TokenTag::LParen));

        let merged = set.union(TokenSet::single(TokenTag::Eof));
        assert_eq!(merged.count(), 3);
    }

    #[test]
    fn test_highest_tag_fits() {
        let set = TokenSet::single(TokenTag::Eof);
        assert!(set.contains(TokenTag::Eof));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![TokenTag::Eof]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenSet::single(TokenTag::RParen).describe(), "`)`");
        assert_eq!(
            TokenSet::single(TokenTag::Comma)
                .with(TokenTag::RParen)
                .describe(),
            "`)` or `,`"
        );
        assert_eq!(
            TokenSet::single(TokenTag::Ident)
                .with(TokenTag::KwThen)
                .with(TokenTag::Colon)
                .describe(),
            "one of identifier, `then`, `:`"
        );
    }

    #[test]
    fn test_boundaries_cannot_start_expressions() {
        for tag in ITEM_BOUNDARY.iter() {
            assert!(!EXPR_START.contains(tag), "{tag:?}");
        }
    }
}
