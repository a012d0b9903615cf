//! Item parsing: function definitions, extern declarations, prototypes, and
//! top-level expressions.

use arx_ir::{Function, Item, Name, Param, ParsedType, Prototype, TokenTag};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one top-level item.
    pub(crate) fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.cursor.current_tag() {
            TokenTag::KwDef => self.parse_definition().map(Item::Function),
            TokenTag::KwExtern => self.parse_extern().map(Item::Extern),
            _ => self.parse_top_level_expr().map(Item::Function),
        }
    }

    /// `def proto [:] body`
    fn parse_definition(&mut self) -> Result<Function, ParseError> {
        let start = self.cursor.advance().span;
        let proto = self.parse_prototype()?;
        self.cursor.eat(TokenTag::Colon);
        let body = self.parse_expr()?;
        let span = start.merge(body.span);
        Ok(Function {
            proto,
            body,
            anonymous: false,
            span,
        })
    }

    /// `extern proto`
    fn parse_extern(&mut self) -> Result<Prototype, ParseError> {
        let start = self.cursor.advance().span;
        let mut proto = self.parse_prototype()?;
        proto.span = start.merge(proto.span);
        Ok(proto)
    }

    /// `name(a: T, b) -> R`
    fn parse_prototype(&mut self) -> Result<Prototype, ParseError> {
        let (name, name_span) = self.cursor.expect_ident()?;
        let open = self.cursor.expect(TokenTag::LParen)?;

        let mut params = Vec::new();
        if !self.cursor.check(TokenTag::RParen) {
            loop {
                let (param_name, param_span) = self.cursor.expect_ident()?;
                let ty = self.parse_type_annotation()?;
                let span = ty.as_ref().map_or(param_span, |ty| param_span.merge(ty.span));
                params.push(Param {
                    name: param_name,
                    span,
                    ty,
                    resolved: None,
                });
                if !self.cursor.eat(TokenTag::Comma) {
                    break;
                }
            }
        }
        let mut end = self.expect_closing_paren(open)?;

        let ret = if self.cursor.eat(TokenTag::Arrow) {
            let ty = self.parse_type()?;
            end = ty.span;
            Some(ty)
        } else {
            None
        };

        Ok(Prototype {
            name,
            span: name_span.merge(end),
            params,
            ret,
            resolved_ret: None,
        })
    }

    /// Optional `: T`.
    pub(crate) fn parse_type_annotation(&mut self) -> Result<Option<ParsedType>, ParseError> {
        if self.cursor.eat(TokenTag::Colon) {
            self.parse_type().map(Some)
        } else {
            Ok(None)
        }
    }

    /// A type is a bare name; the checker decides what it means.
    fn parse_type(&mut self) -> Result<ParsedType, ParseError> {
        let (name, span) = self.cursor.expect_ident()?;
        Ok(ParsedType { name, span })
    }

    /// A free-standing expression, wrapped as a parameterless anonymous
    /// function.
    fn parse_top_level_expr(&mut self) -> Result<Function, ParseError> {
        let body = self.parse_expr()?;
        let name = self.next_anon_name();
        let span = body.span;
        Ok(Function {
            proto: Prototype {
                name: Name::new(&name),
                span,
                params: Vec::new(),
                ret: None,
                resolved_ret: None,
            },
            body,
            anonymous: true,
            span,
        })
    }
}
