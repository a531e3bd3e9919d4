use crate::core::{
    ast::{
        BasicLit, Decl, DeclKeyword, Expr, File, FuncDecl, GenDecl, Ident, ImportSpec, LitKind,
        Spec, TypeSpec, ValueSpec,
    },
    parsers::lexer::TokenKind,
};

use super::{PResult, Parser};

impl Parser<'_> {
    pub(super) fn parse_file(&mut self) -> PResult<File> {
        self.expect(TokenKind::Package)?;
        let package = self.parse_ident()?;
        if package.is_blank() {
            return Err(self.error_at(package.span.lo, "invalid package name _"));
        }
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.kind() == TokenKind::Import {
            decls.push(Decl::Gen(self.parse_gen_decl(DeclKeyword::Import)?));
        }
        while self.kind() != TokenKind::Eof {
            decls.push(self.parse_decl()?);
        }

        Ok(File { package, decls })
    }

    fn parse_decl(&mut self) -> PResult<Decl> {
        match self.kind() {
            TokenKind::Const => Ok(Decl::Gen(self.parse_gen_decl(DeclKeyword::Const)?)),
            TokenKind::Type => Ok(Decl::Gen(self.parse_gen_decl(DeclKeyword::Type)?)),
            TokenKind::Var => Ok(Decl::Gen(self.parse_gen_decl(DeclKeyword::Var)?)),
            TokenKind::Func => Ok(Decl::Func(self.parse_func_decl()?)),
            TokenKind::Import => Err(self.error("imports must appear before other declarations")),
            _ => Err(self.error_expected("declaration")),
        }
    }

    /// `keyword spec` or `keyword ( spec; spec; ... )`.
    pub(super) fn parse_gen_decl(&mut self, keyword: DeclKeyword) -> PResult<GenDecl> {
        let lo = self.next().span;
        let mut specs = Vec::new();

        if self.got(TokenKind::LParen) {
            while self.kind() != TokenKind::RParen && self.kind() != TokenKind::Eof {
                specs.push(self.parse_spec(keyword)?);
                self.expect_semi()?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_spec(keyword)?);
        }
        let span = self.span_from(lo);
        self.expect_semi()?;

        Ok(GenDecl {
            keyword,
            specs,
            span,
        })
    }

    fn parse_spec(&mut self, keyword: DeclKeyword) -> PResult<Spec> {
        match keyword {
            DeclKeyword::Import => self.parse_import_spec().map(Spec::Import),
            DeclKeyword::Type => self.parse_type_spec().map(Spec::Type),
            DeclKeyword::Const | DeclKeyword::Var => {
                self.parse_value_spec(keyword).map(Spec::Value)
            }
        }
    }

    fn parse_import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.kind() {
            TokenKind::Ident => Some(self.parse_ident()?),
            TokenKind::Period => {
                let span = self.next().span;
                Some(Ident {
                    name: ".".to_string(),
                    span,
                })
            }
            _ => None,
        };

        match self.kind() {
            TokenKind::String | TokenKind::RawString => {
                let span = self.next().span;
                let path = BasicLit {
                    kind: LitKind::String,
                    value: self.text(span).to_string(),
                    span,
                };
                if path.value.len() <= 2 {
                    return Err(self.error_at(
                        path.span.lo,
                        format!("invalid import path: {}", path.value),
                    ));
                }
                Ok(ImportSpec { name, path })
            }
            _ => Err(self.error_expected("import path")),
        }
    }

    fn parse_value_spec(&mut self, keyword: DeclKeyword) -> PResult<ValueSpec> {
        let names = self.parse_ident_list()?;
        let ty = match self.kind() {
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen => None,
            _ => Some(self.parse_type()?),
        };
        let values = if self.got(TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        if keyword == DeclKeyword::Var && ty.is_none() && values.is_empty() {
            return Err(self.error_expected("type"));
        }

        Ok(ValueSpec { names, ty, values })
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.parse_ident()?;

        let mut type_params = Vec::new();
        if self.kind() == TokenKind::LBrack && self.starts_type_params() {
            self.next();
            type_params = self.parse_params(TokenKind::RBrack, true)?;
            if type_params.is_empty() {
                return Err(self.error("empty type parameter list"));
            }
        }

        let is_alias = self.got(TokenKind::Assign);
        let ty = self.parse_type()?;

        Ok(TypeSpec {
            name,
            type_params,
            is_alias,
            ty,
        })
    }

    /// Decide whether `type Name [` opens a type parameter list or an array
    /// type.
    ///
    /// `[N]T` and `[N*M]T` are arrays; `[T any]`, `[K, V any]`, `[T ~int]`,
    /// `[T interface{...}]` and `[S []E]` are parameter lists.
    fn starts_type_params(&self) -> bool {
        if self.peek() != TokenKind::Ident {
            return false;
        }
        matches!(
            self.peek_at(2).kind,
            TokenKind::Ident
                | TokenKind::Comma
                | TokenKind::LBrack
                | TokenKind::Tilde
                | TokenKind::Interface
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Struct
        )
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        let lo = self.expect(TokenKind::Func)?;

        let recv = if self.got(TokenKind::LParen) {
            Some(self.parse_params(TokenKind::RParen, false)?)
        } else {
            None
        };

        let name = self.parse_ident()?;

        let mut type_params = Vec::new();
        if self.got(TokenKind::LBrack) {
            type_params = self.parse_params(TokenKind::RBrack, true)?;
        }

        let sig = self.parse_signature(lo)?;

        let body = if self.kind() == TokenKind::LBrace {
            let outer = self.expr_lev;
            self.expr_lev = 0;
            let body = self.parse_block();
            self.expr_lev = outer;
            Some(body?)
        } else {
            None
        };
        let span = self.span_from(lo);
        self.expect_semi()?;

        Ok(FuncDecl {
            recv,
            name,
            type_params,
            sig,
            body,
            span,
        })
    }

    pub(super) fn parse_ident(&mut self) -> PResult<Ident> {
        if self.kind() == TokenKind::Ident {
            let span = self.next().span;
            Ok(Ident {
                name: self.text(span).to_string(),
                span,
            })
        } else {
            Err(self.error_expected("'IDENT'"))
        }
    }

    pub(super) fn parse_ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut names = vec![self.parse_ident()?];
        while self.got(TokenKind::Comma) {
            names.push(self.parse_ident()?);
        }
        Ok(names)
    }

    pub(super) fn ident_expr(&mut self) -> PResult<Expr> {
        self.parse_ident().map(Expr::Ident)
    }
}
