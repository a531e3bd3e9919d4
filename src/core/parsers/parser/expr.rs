use crate::core::{
    ast::{
        BasicLit, BinaryExpr, BinaryOp, CallExpr, CompositeLit, Expr, FuncLit, IndexExpr,
        KeyValueExpr, LitKind, ParenExpr, SelectorExpr, SliceExpr, StarExpr, TypeAssertExpr,
        UnaryExpr, UnaryOp,
    },
    parsers::lexer::TokenKind,
    source::Span,
};

use super::{PResult, Parser};

fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    let op = match kind {
        TokenKind::LogicalOr => (BinaryOp::LogicalOr, 1),
        TokenKind::LogicalAnd => (BinaryOp::LogicalAnd, 2),
        TokenKind::Eql => (BinaryOp::Eql, 3),
        TokenKind::Neq => (BinaryOp::Neq, 3),
        TokenKind::Lss => (BinaryOp::Lss, 3),
        TokenKind::Leq => (BinaryOp::Leq, 3),
        TokenKind::Gtr => (BinaryOp::Gtr, 3),
        TokenKind::Geq => (BinaryOp::Geq, 3),
        TokenKind::Add => (BinaryOp::Add, 4),
        TokenKind::Sub => (BinaryOp::Sub, 4),
        TokenKind::Or => (BinaryOp::Or, 4),
        TokenKind::Xor => (BinaryOp::Xor, 4),
        TokenKind::Mul => (BinaryOp::Mul, 5),
        TokenKind::Quo => (BinaryOp::Quo, 5),
        TokenKind::Rem => (BinaryOp::Rem, 5),
        TokenKind::Shl => (BinaryOp::Shl, 5),
        TokenKind::Shr => (BinaryOp::Shr, 5),
        TokenKind::And => (BinaryOp::And, 5),
        TokenKind::AndNot => (BinaryOp::AndNot, 5),
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    /// An expression or, where Go allows it (call arguments, conversions),
    /// a type.
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(1)
    }

    pub(super) fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.got(TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some((op, prec)) = binary_op(self.kind()) {
            if prec < min_prec {
                break;
            }
            self.next();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary(Box::new(BinaryExpr {
                op,
                span: lhs.span().to(rhs.span()),
                lhs,
                rhs,
            }));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.kind() {
            TokenKind::Add => UnaryOp::Pos,
            TokenKind::Sub => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Xor => UnaryOp::Xor,
            TokenKind::And => UnaryOp::Addr,
            TokenKind::Tilde => UnaryOp::Tilde,
            TokenKind::Arrow if self.peek() == TokenKind::Chan => {
                return self.parse_chan_type();
            }
            TokenKind::Arrow => UnaryOp::Recv,
            TokenKind::Mul => {
                let lo = self.next().span;
                let expr = self.parse_unary()?;
                return Ok(Expr::Star(Box::new(StarExpr {
                    span: self.span_from(lo),
                    expr,
                })));
            }
            _ => return self.parse_primary(),
        };
        let lo = self.next().span;
        let expr = self.parse_unary()?;
        Ok(Expr::Unary(Box::new(UnaryExpr {
            op,
            span: self.span_from(lo),
            expr,
        })))
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let operand = self.parse_operand()?;
        self.parse_primary_from(operand)
    }

    /// Selectors, index and slice expressions, type assertions, calls and
    /// composite literals following `x`.
    fn parse_primary_from(&mut self, mut x: Expr) -> PResult<Expr> {
        loop {
            x = match self.kind() {
                TokenKind::Period => {
                    self.next();
                    match self.kind() {
                        TokenKind::Ident => {
                            let sel = self.parse_ident()?;
                            Expr::Selector(Box::new(SelectorExpr {
                                span: x.span().to(sel.span),
                                expr: x,
                                sel,
                            }))
                        }
                        TokenKind::LParen => self.parse_type_assert(x)?,
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                TokenKind::LBrack => self.parse_index_or_slice(x)?,
                TokenKind::LParen => self.parse_call(x)?,
                TokenKind::LBrace => {
                    if !self.starts_literal(&x) {
                        return Ok(x);
                    }
                    let lo = x.span();
                    self.parse_literal_value(Some(x), lo)?
                }
                _ => return Ok(x),
            };
        }
    }

    /// Whether `x {` begins a composite literal of type `x`.
    fn starts_literal(&self, x: &Expr) -> bool {
        match x.unparen() {
            Expr::Ident(_) | Expr::Selector(_) | Expr::Index(_) => self.expr_lev >= 0,
            Expr::ArrayType(_) | Expr::StructType(_) | Expr::MapType(_) => true,
            _ => false,
        }
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        match self.kind() {
            TokenKind::Ident => self.ident_expr(),
            TokenKind::Number | TokenKind::Char | TokenKind::String | TokenKind::RawString => {
                let token = self.next();
                let kind = match token.kind {
                    TokenKind::Number => LitKind::Number,
                    TokenKind::Char => LitKind::Char,
                    _ => LitKind::String,
                };
                Ok(Expr::BasicLit(BasicLit {
                    kind,
                    value: self.text(token.span).to_string(),
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                let lo = self.next().span;
                self.expr_lev += 1;
                let expr = self.parse_expr();
                self.expr_lev -= 1;
                let expr = expr?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(ParenExpr {
                    span: self.span_from(lo),
                    expr,
                })))
            }
            TokenKind::Func => self.parse_func_type_or_lit(),
            TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface => self.parse_type(),
            _ => Err(self.error_expected("expression")),
        }
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::Func)?;
        let sig = self.parse_signature(lo)?;
        if self.kind() != TokenKind::LBrace {
            return Ok(Expr::FuncType(Box::new(sig)));
        }

        let outer = self.expr_lev;
        self.expr_lev = 0;
        let body = self.parse_block();
        self.expr_lev = outer;
        let body = body?;

        Ok(Expr::FuncLit(Box::new(FuncLit {
            sig,
            body,
            span: self.span_from(lo),
        })))
    }

    fn parse_type_assert(&mut self, x: Expr) -> PResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let ty = if self.got(TokenKind::Type) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(TokenKind::RParen)?;
        Ok(Expr::TypeAssert(Box::new(TypeAssertExpr {
            span: self.span_from(x.span()),
            expr: x,
            ty,
        })))
    }

    /// `x[i]`, `x[lo:hi:max]` or the instantiation `x[A, B]`.
    fn parse_index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        self.expect(TokenKind::LBrack)?;
        self.expr_lev += 1;
        let result = self.parse_index_body(x);
        self.expr_lev -= 1;
        result
    }

    fn parse_index_body(&mut self, x: Expr) -> PResult<Expr> {
        let mut parts: [Option<Expr>; 3] = [None, None, None];
        let mut colons = 0;

        if self.kind() != TokenKind::Colon {
            parts[0] = Some(self.parse_expr()?);
        }

        if self.kind() == TokenKind::Comma {
            let mut indices: Vec<Expr> = parts[0].take().into_iter().collect();
            while self.got(TokenKind::Comma) && self.kind() != TokenKind::RBrack {
                indices.push(self.parse_expr()?);
            }
            self.expect(TokenKind::RBrack)?;
            return Ok(Expr::Index(Box::new(IndexExpr {
                span: self.span_from(x.span()),
                expr: x,
                indices,
            })));
        }

        while colons < 2 && self.got(TokenKind::Colon) {
            colons += 1;
            if !matches!(self.kind(), TokenKind::Colon | TokenKind::RBrack) {
                parts[colons] = Some(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RBrack)?;
        let span = self.span_from(x.span());

        if colons == 0 {
            let Some(index) = parts[0].take() else {
                return Err(self.error_at(span.hi, "expected operand"));
            };
            return Ok(Expr::Index(Box::new(IndexExpr {
                expr: x,
                indices: vec![index],
                span,
            })));
        }

        let [low, high, max] = parts;
        if colons == 2 && (high.is_none() || max.is_none()) {
            return Err(self.error_at(
                span.lo,
                "middle and final index required in 3-index slice",
            ));
        }
        Ok(Expr::Slice(Box::new(SliceExpr {
            expr: x,
            low,
            high,
            max,
            span,
        })))
    }

    fn parse_call(&mut self, func: Expr) -> PResult<Expr> {
        self.expect(TokenKind::LParen)?;
        self.expr_lev += 1;
        let args = self.parse_call_args();
        self.expr_lev -= 1;
        let (args, has_ellipsis) = args?;
        self.expect_closing(TokenKind::RParen, "argument list")?;
        Ok(Expr::Call(Box::new(CallExpr {
            span: self.span_from(func.span()),
            func,
            args,
            has_ellipsis,
        })))
    }

    fn parse_call_args(&mut self) -> PResult<(Vec<Expr>, bool)> {
        let mut args = Vec::new();
        let mut has_ellipsis = false;
        while self.kind() != TokenKind::RParen && self.kind() != TokenKind::Eof {
            args.push(self.parse_expr()?);
            has_ellipsis = self.got(TokenKind::Ellipsis);
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        Ok((args, has_ellipsis))
    }

    /// `{ elements }`, with the current token at `{`. `lo` is where the whole
    /// literal starts: its type, or the brace itself when the type is elided.
    fn parse_literal_value(&mut self, ty: Option<Expr>, lo: Span) -> PResult<Expr> {
        self.expect(TokenKind::LBrace)?;
        let id = self.next_id();
        self.expr_lev += 1;
        let elts = self.parse_elements();
        self.expr_lev -= 1;
        let elts = elts?;
        self.expect_closing(TokenKind::RBrace, "composite literal")?;
        Ok(Expr::CompositeLit(Box::new(CompositeLit {
            id,
            ty,
            elts,
            span: self.span_from(lo),
        })))
    }

    fn parse_elements(&mut self) -> PResult<Vec<Expr>> {
        let mut elts = Vec::new();
        while self.kind() != TokenKind::RBrace && self.kind() != TokenKind::Eof {
            elts.push(self.parse_element()?);
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        Ok(elts)
    }

    fn parse_element(&mut self) -> PResult<Expr> {
        let key = self.parse_element_value()?;
        if !self.got(TokenKind::Colon) {
            return Ok(key);
        }
        let value = self.parse_element_value()?;
        Ok(Expr::KeyValue(Box::new(KeyValueExpr {
            span: key.span().to(value.span()),
            key,
            value,
        })))
    }

    fn parse_element_value(&mut self) -> PResult<Expr> {
        if self.kind() == TokenKind::LBrace {
            let lo = self.span();
            self.parse_literal_value(None, lo)
        } else {
            self.parse_expr()
        }
    }
}
