use arx_ir::{LexErrorKind, Name, Span, TokenKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|token| token.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(Name::new(name))
}

#[test]
fn test_function_definition() {
    assert_eq!(
        kinds("def add(a, b) a + b;"),
        vec![
            TokenKind::Def,
            ident("add"),
            TokenKind::LParen,
            ident("a"),
            TokenKind::Comma,
            ident("b"),
            TokenKind::RParen,
            ident("a"),
            TokenKind::Plus,
            ident("b"),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_and_fn_synonym() {
    assert_eq!(
        kinds("fn extern if then else for in var true false return"),
        vec![
            TokenKind::Def,
            TokenKind::Extern,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Var,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Return,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_multi_char_operators_win() {
    assert_eq!(
        kinds("<= >= == != -> = < > ! :"),
        vec![
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Arrow,
            TokenKind::Eq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Bang,
            TokenKind::Colon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("42 3.5 .25 7."),
        vec![
            TokenKind::Int(42),
            TokenKind::float(3.5),
            TokenKind::float(0.25),
            TokenKind::float(7.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_malformed_number_is_one_error_token() {
    let tokens = lex("3.14.15");
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Error(LexErrorKind::MalformedNumber)
    );
    assert_eq!(tokens[0].span, Span::new(0, 7));
    assert!(tokens[1].is_eof());
}

#[test]
fn test_integer_overflow() {
    assert_eq!(
        kinds("99999999999999999999"),
        vec![
            TokenKind::Error(LexErrorKind::IntegerOverflow),
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("9223372036854775807"),
        vec![TokenKind::Int(i64::MAX), TokenKind::Eof]
    );
}

#[test]
fn test_float_overflow() {
    let huge = format!("1{}.0", "0".repeat(400));
    let tokens = lex(&huge);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::FloatOverflow));
    assert_eq!(tokens[0].span, Span::new(0, 403));
    assert_eq!(
        kinds(&format!("17976931348623157{}.0", "0".repeat(292))),
        vec![TokenKind::float(f64::MAX), TokenKind::Eof]
    );
}

#[test]
fn test_unrecognized_character_does_not_abort() {
    let tokens = lex("a $ b");
    assert_eq!(
        tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
        vec![
            ident("a"),
            TokenKind::Error(LexErrorKind::UnrecognizedChar('$')),
            ident("b"),
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[1].span, Span::new(2, 3));
    assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (1, 3));
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# leading comment\nx # trailing\n# last"),
        vec![ident("x"), TokenKind::Eof]
    );
}

#[test]
fn test_positions() {
    let tokens = lex("def f(x)\n  x * 2;");
    let star = &tokens[6];
    assert_eq!(star.kind, TokenKind::Star);
    assert_eq!(star.span, Span::new(13, 14));
    assert_eq!((star.pos.line, star.pos.column, star.pos.offset), (2, 5, 13));
}

#[test]
fn test_empty_source_yields_only_eof() {
    let tokens = lex("");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].span, Span::point(0));

    assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
}

#[test]
fn test_stream_is_fused_after_eof() {
    let mut stream = TokenStream::new("x");
    assert_eq!(stream.next().map(|t| t.kind), Some(ident("x")));
    assert_eq!(stream.next().map(|t| t.kind), Some(TokenKind::Eof));
    assert_eq!(stream.next(), None);
    assert_eq!(stream.next(), None);
}

#[test]
fn test_restart_reproduces_tokens() {
    let source = "var x = 1 in\n  x = x + 2.5";
    let mut stream = TokenStream::new(source);
    let first: Vec<_> = stream.by_ref().collect();
    stream.restart();
    let second: Vec<_> = stream.by_ref().collect();
    assert_eq!(first, second);
    assert_eq!(stream.source(), source);
}

#[test]
fn test_restart_mid_stream() {
    let mut stream = TokenStream::new("a b c");
    stream.next();
    stream.next();
    stream.restart();
    assert_eq!(stream.next().map(|t| t.kind), Some(ident("a")));
}

proptest! {
    #[test]
    fn prop_lexing_is_total(source in "\\PC{0,64}") {
        let tokens = lex(&source);
        let eof_count = tokens.iter().filter(|t| t.is_eof()).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert!(tokens.last().is_some_and(arx_ir::Token::is_eof));

        let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        let mut previous_end = 0;
        for token in &tokens {
            prop_assert!(token.span.start >= previous_end);
            prop_assert!(token.span.end <= len);
            previous_end = token.span.end;
        }
    }

    #[test]
    fn prop_integers_round_trip(value in 0..i64::MAX) {
        prop_assert_eq!(kinds(&value.to_string()), vec![TokenKind::Int(value), TokenKind::Eof]);
    }
}
