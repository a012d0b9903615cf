//! Raw token recognizer generated by logos.
//!
//! Recognizes shapes only. Keyword lookup, numeric validation, and
//! position tracking happen in the cooking layer.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*")]
    LineComment,

    /// Identifier or keyword.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    /// Maximal run of digits and dots. Validated when cooked, so that
    /// `3.14.15` becomes one error token instead of `3.14` and `.15`.
    #[regex(r"[0-9][0-9.]*")]
    #[regex(r"\.[0-9][0-9.]*")]
    Number,

    #[token("->")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
}
