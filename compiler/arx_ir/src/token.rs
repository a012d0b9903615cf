//! Token types for the Arx lexer.
//!
//! A [`Token`] pairs a [`TokenKind`] with the byte [`Span`] it covers and the
//! line/column [`Position`] of its first character. [`TokenTag`] is the
//! data-free discriminant used by the parser for O(1) set membership.

use super::{Name, Position, Span};
use std::fmt;

/// A token with its location in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: Position,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, pos: Position) -> Self {
        Token { kind, span, pos }
    }

    /// Create a dummy token for tests and generated code.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
            pos: Position::START,
        }
    }

    #[inline]
    pub fn tag(&self) -> TokenTag {
        self.kind.tag()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?} ({})", self.kind, self.span, self.pos)
    }
}

/// Why the lexer produced an error token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LexErrorKind {
    /// A character that starts no token.
    UnrecognizedChar(char),
    /// A numeric run with more than one decimal point, e.g. `3.14.15`.
    MalformedNumber,
    /// An integer literal that does not fit in 64 bits.
    IntegerOverflow,
    /// A float literal too large to be a finite `f64`.
    FloatOverflow,
}

impl LexErrorKind {
    /// Short human-readable description, used in diagnostics.
    pub fn message(self) -> String {
        match self {
            LexErrorKind::UnrecognizedChar(c) => format!("unrecognized character `{c}`"),
            LexErrorKind::MalformedNumber => {
                "malformed numeric literal: more than one decimal point".to_string()
            }
            LexErrorKind::IntegerOverflow => "integer literal is too large".to_string(),
            LexErrorKind::FloatOverflow => "float literal is too large".to_string(),
        }
    }
}

/// Token kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    /// Integer literal (no decimal point).
    Int(i64),
    /// Float literal, stored as `f64` bits.
    Float(u64),
    Ident(Name),

    // Keywords
    /// `def` (also spelled `fn`).
    Def,
    Extern,
    If,
    Then,
    Else,
    For,
    In,
    Var,
    True,
    False,
    Return,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    Eq,
    Bang,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Arrow,

    /// Lexical error; the span covers the offending text.
    Error(LexErrorKind),
    Eof,
}

impl TokenKind {
    /// Build a float token from an `f64` value.
    #[inline]
    pub fn float(value: f64) -> Self {
        TokenKind::Float(value.to_bits())
    }

    /// Discriminant tag for set membership and diagnostics.
    pub const fn tag(&self) -> TokenTag {
        match self {
            TokenKind::Int(_) => TokenTag::Int,
            TokenKind::Float(_) => TokenTag::Float,
            TokenKind::Ident(_) => TokenTag::Ident,
            TokenKind::Def => TokenTag::KwDef,
            TokenKind::Extern => TokenTag::KwExtern,
            TokenKind::If => TokenTag::KwIf,
            TokenKind::Then => TokenTag::KwThen,
            TokenKind::Else => TokenTag::KwElse,
            TokenKind::For => TokenTag::KwFor,
            TokenKind::In => TokenTag::KwIn,
            TokenKind::Var => TokenTag::KwVar,
            TokenKind::True => TokenTag::KwTrue,
            TokenKind::False => TokenTag::KwFalse,
            TokenKind::Return => TokenTag::KwReturn,
            TokenKind::Plus => TokenTag::Plus,
            TokenKind::Minus => TokenTag::Minus,
            TokenKind::Star => TokenTag::Star,
            TokenKind::Slash => TokenTag::Slash,
            TokenKind::Lt => TokenTag::Lt,
            TokenKind::Gt => TokenTag::Gt,
            TokenKind::LtEq => TokenTag::LtEq,
            TokenKind::GtEq => TokenTag::GtEq,
            TokenKind::EqEq => TokenTag::EqEq,
            TokenKind::NotEq => TokenTag::NotEq,
            TokenKind::Eq => TokenTag::Eq,
            TokenKind::Bang => TokenTag::Bang,
            TokenKind::LParen => TokenTag::LParen,
            TokenKind::RParen => TokenTag::RParen,
            TokenKind::Comma => TokenTag::Comma,
            TokenKind::Semicolon => TokenTag::Semicolon,
            TokenKind::Colon => TokenTag::Colon,
            TokenKind::Arrow => TokenTag::Arrow,
            TokenKind::Error(_) => TokenTag::Error,
            TokenKind::Eof => TokenTag::Eof,
        }
    }

    /// Look up the keyword for an identifier-shaped word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "def" | "fn" => TokenKind::Def,
            "extern" => TokenKind::Extern,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "var" => TokenKind::Var,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "return" => TokenKind::Return,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if this token can start an expression.
    pub fn can_start_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::For
                | TokenKind::Var
                | TokenKind::Return
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Bang
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Error(kind) => write!(f, "<error: {}>", kind.message()),
            other => f.write_str(other.tag().display_name()),
        }
    }
}

/// Data-free token discriminant.
///
/// The numeric value of each tag indexes a bit in the parser's `TokenSet`,
/// so the enum must stay below 64 variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenTag {
    Int,
    Float,
    Ident,
    KwDef,
    KwExtern,
    KwIf,
    KwThen,
    KwElse,
    KwFor,
    KwIn,
    KwVar,
    KwTrue,
    KwFalse,
    KwReturn,
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    Eq,
    Bang,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Arrow,
    Error,
    Eof,
}

impl TokenTag {
    /// Every tag, in discriminant order.
    pub const ALL: [TokenTag; 34] = [
        TokenTag::Int,
        TokenTag::Float,
        TokenTag::Ident,
        TokenTag::KwDef,
        TokenTag::KwExtern,
        TokenTag::KwIf,
        TokenTag::KwThen,
        TokenTag::KwElse,
        TokenTag::KwFor,
        TokenTag::KwIn,
        TokenTag::KwVar,
        TokenTag::KwTrue,
        TokenTag::KwFalse,
        TokenTag::KwReturn,
        TokenTag::Plus,
        TokenTag::Minus,
        TokenTag::Star,
        TokenTag::Slash,
        TokenTag::Lt,
        TokenTag::Gt,
        TokenTag::LtEq,
        TokenTag::GtEq,
        TokenTag::EqEq,
        TokenTag::NotEq,
        TokenTag::Eq,
        TokenTag::Bang,
        TokenTag::LParen,
        TokenTag::RParen,
        TokenTag::Comma,
        TokenTag::Semicolon,
        TokenTag::Colon,
        TokenTag::Arrow,
        TokenTag::Error,
        TokenTag::Eof,
    ];

    /// Get a display name for the tag, as shown in "expected ..." messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            TokenTag::Int => "integer",
            TokenTag::Float => "float",
            TokenTag::Ident => "identifier",
            TokenTag::KwDef => "def",
            TokenTag::KwExtern => "extern",
            TokenTag::KwIf => "if",
            TokenTag::KwThen => "then",
            TokenTag::KwElse => "else",
            TokenTag::KwFor => "for",
            TokenTag::KwIn => "in",
            TokenTag::KwVar => "var",
            TokenTag::KwTrue => "true",
            TokenTag::KwFalse => "false",
            TokenTag::KwReturn => "return",
            TokenTag::Plus => "+",
            TokenTag::Minus => "-",
            TokenTag::Star => "*",
            TokenTag::Slash => "/",
            TokenTag::Lt => "<",
            TokenTag::Gt => ">",
            TokenTag::LtEq => "<=",
            TokenTag::GtEq => ">=",
            TokenTag::EqEq => "==",
            TokenTag::NotEq => "!=",
            TokenTag::Eq => "=",
            TokenTag::Bang => "!",
            TokenTag::LParen => "(",
            TokenTag::RParen => ")",
            TokenTag::Comma => ",",
            TokenTag::Semicolon => ";",
            TokenTag::Colon => ":",
            TokenTag::Arrow => "->",
            TokenTag::Error => "invalid token",
            TokenTag::Eof => "end of input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tag_order_matches_all_table() {
        for (index, tag) in TokenTag::ALL.iter().enumerate() {
            assert_eq!(*tag as usize, index, "tag {tag:?} out of order");
        }
    }

    #[test]
    fn test_fn_and_def_are_the_same_keyword() {
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Def));
        assert_eq!(TokenKind::keyword("def"), Some(TokenKind::Def));
        assert_eq!(TokenKind::keyword("define"), None);
        assert_eq!(TokenKind::keyword("return"), Some(TokenKind::Return));
    }

    #[test]
    fn test_display_uses_source_spelling() {
        assert_eq!(TokenKind::Arrow.to_string(), "->");
        assert_eq!(TokenKind::Int(42).to_string(), "42");
        assert_eq!(TokenKind::float(2.5).to_string(), "2.5");
        assert_eq!(TokenKind::Ident(Name::new("x")).to_string(), "x");
    }

    #[test]
    fn test_can_start_expr() {
        assert!(TokenKind::Minus.can_start_expr());
        assert!(TokenKind::Var.can_start_expr());
        assert!(TokenKind::Return.can_start_expr());
        assert!(!TokenKind::Semicolon.can_start_expr());
        assert!(!TokenKind::Plus.can_start_expr());
    }
}
