//! Grammar productions, as `impl Parser` blocks.
//!
//! - `item.rs`: definitions, externs, prototypes, top-level expressions
//! - `expr/`: expressions (precedence climbing, unary, primary forms)

mod expr;
mod item;

use arx_ir::{Span, TokenTag};

use crate::recovery::ITEM_BOUNDARY;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Consume the `)` matching the `(` at `open`.
    ///
    /// Running into an item boundary means the group was never closed
    /// (`E1003`); any other token is merely unexpected (`E1001`).
    pub(crate) fn expect_closing_paren(&mut self, open: Span) -> Result<Span, ParseError> {
        if self.cursor.check(TokenTag::RParen) {
            return Ok(self.cursor.advance().span);
        }
        if let Some(error) = self.cursor.lexical_error() {
            return Err(error);
        }
        if ITEM_BOUNDARY.contains(self.cursor.current_tag()) {
            return Err(ParseError::unclosed_paren(
                self.cursor.current_kind(),
                self.cursor.current_span(),
                open,
                self.cursor.expected(),
            ));
        }
        Err(self.cursor.unexpected())
    }
}
