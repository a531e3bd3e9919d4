use crate::core::{
    ast::{
        ArrayType, BasicLit, BinaryExpr, BinaryOp, ChanDir, ChanType, EllipsisExpr, Expr, Field,
        FuncType, Ident, IndexExpr, InterfaceType, LitKind, MapType, ParenExpr, SelectorExpr,
        StarExpr, StructType, UnaryExpr, UnaryOp,
    },
    parsers::lexer::TokenKind,
    source::Span,
};

use super::{PResult, Parser};

/// One entry of a parameter list before names and types are paired up.
enum ParamEntry {
    /// A lone identifier: a parameter name or a type name.
    Bare(Ident),
    /// A type with no name in front of it.
    Type(Expr),
    Named(Ident, Expr),
}

/// Result of parsing `name [` in a field or parameter position.
enum ArrayOrInstance {
    /// `name [N]T` or `name []T`.
    Named(Ident, Expr),
    /// The generic type `name[A, B]`.
    Instance(Expr),
}

impl Parser<'_> {
    pub(super) fn parse_type(&mut self) -> PResult<Expr> {
        match self.kind() {
            TokenKind::Ident => self.parse_type_name(),
            TokenKind::LBrack => self.parse_array_type(),
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Mul => {
                let lo = self.next().span;
                let expr = self.parse_type()?;
                Ok(Expr::Star(Box::new(StarExpr {
                    span: self.span_from(lo),
                    expr,
                })))
            }
            TokenKind::Func => {
                let lo = self.next().span;
                let sig = self.parse_signature(lo)?;
                Ok(Expr::FuncType(Box::new(sig)))
            }
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::Map => self.parse_map_type(),
            TokenKind::Chan | TokenKind::Arrow => self.parse_chan_type(),
            TokenKind::LParen => {
                let lo = self.next().span;
                let expr = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(ParenExpr {
                    span: self.span_from(lo),
                    expr,
                })))
            }
            _ => Err(self.error_expected("type")),
        }
    }

    /// `Name`, `pkg.Name`, optionally instantiated: `Name[A, B]`.
    fn parse_type_name(&mut self) -> PResult<Expr> {
        let ident = self.parse_ident()?;
        let name = self.parse_qualified_rest(Expr::Ident(ident))?;
        if self.kind() == TokenKind::LBrack {
            self.parse_type_args(name)
        } else {
            Ok(name)
        }
    }

    fn parse_qualified_rest(&mut self, name: Expr) -> PResult<Expr> {
        if !self.got(TokenKind::Period) {
            return Ok(name);
        }
        let sel = self.parse_ident()?;
        Ok(Expr::Selector(Box::new(SelectorExpr {
            span: name.span().to(sel.span),
            expr: name,
            sel,
        })))
    }

    fn parse_type_args(&mut self, name: Expr) -> PResult<Expr> {
        self.expect(TokenKind::LBrack)?;
        self.expr_lev += 1;
        let mut indices = vec![self.parse_type()?];
        while self.got(TokenKind::Comma) && self.kind() != TokenKind::RBrack {
            indices.push(self.parse_type()?);
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack)?;
        Ok(Expr::Index(Box::new(IndexExpr {
            span: self.span_from(name.span()),
            expr: name,
            indices,
        })))
    }

    /// `[]T`, `[N]T` or `[...]T`, starting at `[`.
    pub(super) fn parse_array_type(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::LBrack)?;
        let len = match self.kind() {
            TokenKind::RBrack => None,
            TokenKind::Ellipsis => {
                let span = self.next().span;
                Some(Expr::Ellipsis(Box::new(EllipsisExpr { elem: None, span })))
            }
            _ => {
                self.expr_lev += 1;
                let len = self.parse_expr();
                self.expr_lev -= 1;
                Some(len?)
            }
        };
        self.expect(TokenKind::RBrack)?;
        let elem = self.parse_type()?;
        Ok(Expr::ArrayType(Box::new(ArrayType {
            len,
            span: self.span_from(lo),
            elem,
        })))
    }

    fn parse_struct_type(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while self.kind() != TokenKind::RBrace && self.kind() != TokenKind::Eof {
            fields.push(self.parse_field_decl()?);
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::StructType(Box::new(StructType {
            fields,
            span: self.span_from(lo),
        })))
    }

    fn parse_field_decl(&mut self) -> PResult<Field> {
        let (names, ty) = match self.kind() {
            TokenKind::Mul => {
                let lo = self.next().span;
                let expr = self.parse_type_name()?;
                let ty = Expr::Star(Box::new(StarExpr {
                    span: self.span_from(lo),
                    expr,
                }));
                (Vec::new(), ty)
            }
            TokenKind::Ident => match self.peek() {
                TokenKind::Period
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::Semicolon
                | TokenKind::RBrace => (Vec::new(), self.parse_type_name()?),
                TokenKind::LBrack => {
                    let name = self.parse_ident()?;
                    match self.parse_array_field_or_instance(name)? {
                        ArrayOrInstance::Named(name, ty) => (vec![name], ty),
                        ArrayOrInstance::Instance(ty) => (Vec::new(), ty),
                    }
                }
                _ => {
                    let names = self.parse_ident_list()?;
                    (names, self.parse_type()?)
                }
            },
            _ => return Err(self.error_expected("field name or embedded type")),
        };

        let tag = match self.kind() {
            TokenKind::String | TokenKind::RawString => {
                let span = self.next().span;
                Some(BasicLit {
                    kind: LitKind::String,
                    value: self.text(span).to_string(),
                    span,
                })
            }
            _ => None,
        };

        Ok(Field { names, ty, tag })
    }

    /// After `name`, with the current token at `[`: tell `name [N]T` apart
    /// from the instantiated type `name[A]`.
    fn parse_array_field_or_instance(&mut self, name: Ident) -> PResult<ArrayOrInstance> {
        let lo = self.span();
        if self.peek() == TokenKind::RBrack || self.peek() == TokenKind::Ellipsis {
            let ty = self.parse_array_type()?;
            return Ok(ArrayOrInstance::Named(name, ty));
        }

        self.expect(TokenKind::LBrack)?;
        self.expr_lev += 1;
        let mut args = vec![self.parse_expr()?];
        while self.got(TokenKind::Comma) && self.kind() != TokenKind::RBrack {
            args.push(self.parse_expr()?);
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack)?;

        if args.len() == 1 && self.starts_type() {
            let len = args.pop();
            let elem = self.parse_type()?;
            let ty = Expr::ArrayType(Box::new(ArrayType {
                len,
                span: self.span_from(lo),
                elem,
            }));
            return Ok(ArrayOrInstance::Named(name, ty));
        }

        let span = self.span_from(name.span);
        Ok(ArrayOrInstance::Instance(Expr::Index(Box::new(IndexExpr {
            expr: Expr::Ident(name),
            indices: args,
            span,
        }))))
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::LBrack
                | TokenKind::Mul
                | TokenKind::LParen
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::Arrow
        )
    }

    /// Parameters and results after `func` or a method name; `lo` is where
    /// the signature's owner starts.
    pub(super) fn parse_signature(&mut self, lo: Span) -> PResult<FuncType> {
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params(TokenKind::RParen, false)?;
        let results = if self.got(TokenKind::LParen) {
            self.parse_params(TokenKind::RParen, false)?
        } else if self.starts_type() {
            vec![Field {
                names: Vec::new(),
                ty: self.parse_type()?,
                tag: None,
            }]
        } else {
            Vec::new()
        };
        Ok(FuncType {
            params,
            results,
            span: self.span_from(lo),
        })
    }

    /// Parameter list after its opening delimiter, through `close`.
    ///
    /// With `constraints`, entry types are type constraints (`~int | string`),
    /// as in type parameter lists.
    pub(super) fn parse_params(&mut self, close: TokenKind, constraints: bool) -> PResult<Vec<Field>> {
        let mut entries = Vec::new();
        while self.kind() != close && self.kind() != TokenKind::Eof {
            entries.push(self.parse_param_entry(close, constraints)?);
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;

        let named = entries
            .iter()
            .any(|entry| matches!(entry, ParamEntry::Named(..)));
        if !named {
            return Ok(entries
                .into_iter()
                .map(|entry| {
                    let ty = match entry {
                        ParamEntry::Bare(ident) => Expr::Ident(ident),
                        ParamEntry::Type(ty) | ParamEntry::Named(_, ty) => ty,
                    };
                    Field {
                        names: Vec::new(),
                        ty,
                        tag: None,
                    }
                })
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(ident) => pending.push(ident),
                ParamEntry::Named(ident, ty) => {
                    pending.push(ident);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        ty,
                        tag: None,
                    });
                }
                ParamEntry::Type(ty) => {
                    return Err(self.error_at(
                        ty.span().lo,
                        "mixed named and unnamed parameters",
                    ));
                }
            }
        }
        if let Some(ident) = pending.first() {
            return Err(self.error_at(ident.span.lo, "mixed named and unnamed parameters"));
        }
        Ok(fields)
    }

    fn parse_param_entry(&mut self, close: TokenKind, constraints: bool) -> PResult<ParamEntry> {
        match self.kind() {
            TokenKind::Ident => {
                let ident = self.parse_ident()?;
                match self.kind() {
                    kind if kind == close || kind == TokenKind::Comma => Ok(ParamEntry::Bare(ident)),
                    TokenKind::Period => {
                        let name = self.parse_qualified_rest(Expr::Ident(ident))?;
                        let ty = if self.kind() == TokenKind::LBrack {
                            self.parse_type_args(name)?
                        } else {
                            name
                        };
                        Ok(ParamEntry::Type(ty))
                    }
                    TokenKind::LBrack => match self.parse_array_field_or_instance(ident)? {
                        ArrayOrInstance::Named(name, ty) => Ok(ParamEntry::Named(name, ty)),
                        ArrayOrInstance::Instance(ty) => Ok(ParamEntry::Type(ty)),
                    },
                    TokenKind::Ellipsis => {
                        let ty = self.parse_variadic()?;
                        Ok(ParamEntry::Named(ident, ty))
                    }
                    _ => {
                        let ty = self.parse_param_type(constraints)?;
                        Ok(ParamEntry::Named(ident, ty))
                    }
                }
            }
            TokenKind::Ellipsis => Ok(ParamEntry::Type(self.parse_variadic()?)),
            _ => Ok(ParamEntry::Type(self.parse_param_type(constraints)?)),
        }
    }

    fn parse_param_type(&mut self, constraints: bool) -> PResult<Expr> {
        if constraints {
            self.parse_constraint()
        } else {
            self.parse_type()
        }
    }

    fn parse_variadic(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::Ellipsis)?;
        let elem = self.parse_type()?;
        Ok(Expr::Ellipsis(Box::new(EllipsisExpr {
            span: self.span_from(lo),
            elem: Some(elem),
        })))
    }

    /// A union of type terms: `~int | string | fmt.Stringer`.
    fn parse_constraint(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_type_term()?;
        while self.kind() == TokenKind::Or {
            self.next();
            let rhs = self.parse_type_term()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                op: BinaryOp::Or,
                span: expr.span().to(rhs.span()),
                lhs: expr,
                rhs,
            }));
        }
        Ok(expr)
    }

    fn parse_type_term(&mut self) -> PResult<Expr> {
        if self.kind() == TokenKind::Tilde {
            let lo = self.next().span;
            let expr = self.parse_type()?;
            return Ok(Expr::Unary(Box::new(UnaryExpr {
                op: UnaryOp::Tilde,
                span: self.span_from(lo),
                expr,
            })));
        }
        self.parse_type()
    }

    fn parse_interface_type(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::Interface)?;
        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        let mut embeds = Vec::new();
        while self.kind() != TokenKind::RBrace && self.kind() != TokenKind::Eof {
            if self.kind() == TokenKind::Ident && self.peek() == TokenKind::LParen {
                let name = self.parse_ident()?;
                let sig = self.parse_signature(name.span)?;
                methods.push(Field {
                    names: vec![name],
                    ty: Expr::FuncType(Box::new(sig)),
                    tag: None,
                });
            } else {
                embeds.push(self.parse_constraint()?);
            }
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::InterfaceType(Box::new(InterfaceType {
            methods,
            embeds,
            span: self.span_from(lo),
        })))
    }

    fn parse_map_type(&mut self) -> PResult<Expr> {
        let lo = self.expect(TokenKind::Map)?;
        self.expect(TokenKind::LBrack)?;
        let key = self.parse_type()?;
        self.expect(TokenKind::RBrack)?;
        let value = self.parse_type()?;
        Ok(Expr::MapType(Box::new(MapType {
            key,
            value,
            span: self.span_from(lo),
        })))
    }

    /// `chan T`, `chan<- T` or `<-chan T`.
    pub(super) fn parse_chan_type(&mut self) -> PResult<Expr> {
        let lo = self.span();
        let dir = if self.got(TokenKind::Arrow) {
            self.expect(TokenKind::Chan)?;
            ChanDir::Recv
        } else {
            self.expect(TokenKind::Chan)?;
            if self.got(TokenKind::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        };
        let elem = self.parse_type()?;
        Ok(Expr::ChanType(Box::new(ChanType {
            dir,
            elem,
            span: self.span_from(lo),
        })))
    }
}
