//! Primary expressions: literals, names, calls, parenthesized groups,
//! `return`, and the control-flow forms `if`, `for` and `var`.

use arx_ir::{
    Expr, ExprKind, ForExpr, IfExpr, Name, Span, TokenKind, TokenTag, ValueForm, VarBinding,
    VarExpr,
};
use tracing::trace;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(value) => ExprKind::Int(*value),
            TokenKind::Float(bits) => ExprKind::Float(*bits),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Ident(name) => {
                self.cursor.advance();
                return self.parse_name_or_call(name.clone(), span);
            }
            TokenKind::LParen => return self.parse_group(),
            TokenKind::If => return self.parse_if(),
            TokenKind::For => return self.parse_for(),
            TokenKind::Var => return self.parse_var(),
            TokenKind::Return => return self.parse_return(),
            found => {
                return Err(self.cursor.lexical_error().unwrap_or_else(|| {
                    ParseError::expected_expression(found, span, None)
                }));
            }
        };
        self.cursor.advance();
        Ok(Expr::new(kind, span))
    }

    /// `name` or `name(args...)`.
    fn parse_name_or_call(&mut self, name: Name, name_span: Span) -> Result<Expr, ParseError> {
        if !self.cursor.check(TokenTag::LParen) {
            return Ok(Expr::new(ExprKind::Ident(name), name_span));
        }
        let open = self.cursor.advance().span;

        let mut args = Vec::new();
        if !self.cursor.check(TokenTag::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.cursor.eat(TokenTag::Comma) {
                    break;
                }
            }
        }
        let close = self.expect_closing_paren(open)?;

        trace!(callee = %name, args = args.len(), "call");
        Ok(Expr::new(
            ExprKind::Call {
                callee: name,
                callee_span: name_span,
                args,
            },
            name_span.merge(close),
        ))
    }

    /// `( expr )`. The group keeps the inner node, widened to cover the
    /// parentheses.
    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        let open = self.cursor.advance().span;
        let mut inner = self.parse_expr()?;
        let close = self.expect_closing_paren(open)?;
        inner.span = open.merge(close);
        Ok(inner)
    }

    /// `return expr`. The operand extends as far right as it can, like the
    /// body of `var`.
    fn parse_return(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.advance().span;
        let value = self.parse_expr()?;
        let span = start.merge(value.span);
        Ok(Expr::new(ExprKind::Return(Box::new(value)), span))
    }

    /// `if cond (then | :) a else [:] b`
    fn parse_if(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.advance().span;
        let cond = self.parse_expr()?;
        if !(self.cursor.eat(TokenTag::KwThen) || self.cursor.eat(TokenTag::Colon)) {
            return Err(self.cursor.unexpected());
        }
        let then_branch = self.parse_expr()?;
        self.cursor.expect(TokenTag::KwElse)?;
        self.cursor.eat(TokenTag::Colon);
        let else_branch = self.parse_expr()?;

        let span = start.merge(else_branch.span);
        Ok(Expr::new(
            ExprKind::If(Box::new(IfExpr {
                cond,
                then_branch,
                else_branch,
                form: ValueForm::Value,
            })),
            span,
        ))
    }

    /// `for i [: T] = start, end [, step] in body`
    fn parse_for(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.cursor.advance().span;
        let (var, var_span) = self.cursor.expect_ident()?;
        let var_ty = self.parse_type_annotation()?;
        self.cursor.expect(TokenTag::Eq)?;
        let start = self.parse_expr()?;
        self.cursor.expect(TokenTag::Comma)?;
        let end = self.parse_expr()?;
        let step = if self.cursor.eat(TokenTag::Comma) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenTag::KwIn)?;
        let body = self.parse_expr()?;

        let span = start_span.merge(body.span);
        Ok(Expr::new(
            ExprKind::For(Box::new(ForExpr {
                var,
                var_span,
                var_ty,
                start,
                end,
                step,
                body,
                form: ValueForm::Value,
            })),
            span,
        ))
    }

    /// `var a [: T] [= init], ... in body`
    fn parse_var(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.advance().span;

        let mut bindings = Vec::new();
        loop {
            let (name, name_span) = self.cursor.expect_ident()?;
            let ty = self.parse_type_annotation()?;
            let init = if self.cursor.eat(TokenTag::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let end = init
                .as_ref()
                .map(|init| init.span)
                .or(ty.as_ref().map(|ty| ty.span))
                .unwrap_or(name_span);
            bindings.push(VarBinding {
                name,
                span: name_span.merge(end),
                ty,
                init,
            });
            if !self.cursor.eat(TokenTag::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenTag::KwIn)?;
        let body = self.parse_expr()?;

        let span = start.merge(body.span);
        Ok(Expr::new(
            ExprKind::Var(Box::new(VarExpr {
                bindings,
                body,
                form: ValueForm::Value,
            })),
            span,
        ))
    }
}
