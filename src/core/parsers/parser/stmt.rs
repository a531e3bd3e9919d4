use crate::core::{
    ast::{
        AssignOp, AssignStmt, Block, BranchKind, BranchStmt, CaseClause, CommClause, DeclKeyword,
        Expr, ForStmt, Ident, IfStmt, IncDecStmt, LabeledStmt, RangeStmt, SelectStmt, SendStmt,
        Stmt, SwitchStmt, TypeSwitchStmt,
    },
    parsers::lexer::TokenKind,
};

use super::{PResult, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    /// `label:` may start the statement.
    LabelOk,
    /// A `range` clause may follow the assignment operator.
    RangeOk,
}

enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
    },
}

impl Parser<'_> {
    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let lo = self.expect(TokenKind::LBrace)?;
        let stmts = self.parse_stmt_list()?;
        self.expect(TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: self.span_from(lo),
        })
    }

    fn parse_stmt_list(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let stmt = match self.kind() {
            TokenKind::Const => return Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Const)?)),
            TokenKind::Type => return Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Type)?)),
            TokenKind::Var => return Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Var)?)),

            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::RawString
            | TokenKind::Func
            | TokenKind::LParen
            | TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::And
            | TokenKind::Xor
            | TokenKind::Arrow
            | TokenKind::Not
            | TokenKind::Tilde => {
                let stmt = self.parse_simple_stmt_only(SimpleMode::LabelOk)?;
                if matches!(stmt, Stmt::Labeled(_)) {
                    return Ok(stmt);
                }
                stmt
            }

            TokenKind::Go => {
                self.next();
                Stmt::Go(self.parse_expr()?)
            }
            TokenKind::Defer => {
                self.next();
                Stmt::Defer(self.parse_expr()?)
            }
            TokenKind::Return => {
                self.next();
                let results = match self.kind() {
                    TokenKind::Semicolon | TokenKind::RBrace => Vec::new(),
                    _ => self.parse_expr_list()?,
                };
                Stmt::Return(results)
            }
            TokenKind::Break | TokenKind::Continue | TokenKind::Goto | TokenKind::Fallthrough => {
                self.parse_branch_stmt()?
            }
            TokenKind::LBrace => Stmt::Block(self.parse_block()?),
            TokenKind::If => self.parse_if_stmt()?,
            TokenKind::Switch => self.parse_switch_stmt()?,
            TokenKind::Select => self.parse_select_stmt()?,
            TokenKind::For => self.parse_for_stmt()?,
            TokenKind::Semicolon => {
                let span = self.next().span;
                return Ok(Stmt::Empty(span));
            }
            _ => return Err(self.error_expected("statement")),
        };
        self.expect_semi()?;
        Ok(stmt)
    }

    fn parse_branch_stmt(&mut self) -> PResult<Stmt> {
        let kind = match self.next().kind {
            TokenKind::Break => BranchKind::Break,
            TokenKind::Continue => BranchKind::Continue,
            TokenKind::Goto => BranchKind::Goto,
            _ => BranchKind::Fallthrough,
        };
        let label = if kind != BranchKind::Fallthrough && self.kind() == TokenKind::Ident {
            Some(self.parse_ident()?)
        } else {
            None
        };
        Ok(Stmt::Branch(BranchStmt { kind, label }))
    }

    fn parse_simple_stmt_only(&mut self, mode: SimpleMode) -> PResult<Stmt> {
        match self.parse_simple_stmt(mode)? {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range { .. } => Err(self.error("unexpected range clause")),
        }
    }

    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> PResult<Simple> {
        if mode == SimpleMode::RangeOk && self.kind() == TokenKind::Range {
            self.next();
            let expr = self.parse_expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                define: false,
                expr,
            });
        }

        let mut lhs = self.parse_expr_list()?;

        let op = match self.kind() {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::Define => Some(AssignOp::Define),
            TokenKind::AddAssign
            | TokenKind::SubAssign
            | TokenKind::MulAssign
            | TokenKind::QuoAssign
            | TokenKind::RemAssign
            | TokenKind::AndAssign
            | TokenKind::OrAssign
            | TokenKind::XorAssign
            | TokenKind::ShlAssign
            | TokenKind::ShrAssign
            | TokenKind::AndNotAssign => Some(AssignOp::Compound),
            _ => None,
        };

        if let Some(op) = op {
            self.next();
            if mode == SimpleMode::RangeOk
                && self.kind() == TokenKind::Range
                && op != AssignOp::Compound
            {
                self.next();
                let expr = self.parse_expr()?;
                if lhs.len() > 2 {
                    return Err(self.error_at(
                        lhs[2].span().lo,
                        "range clause permits at most two iteration variables",
                    ));
                }
                let mut vars = lhs.into_iter();
                return Ok(Simple::Range {
                    key: vars.next(),
                    value: vars.next(),
                    define: op == AssignOp::Define,
                    expr,
                });
            }
            let rhs = self.parse_expr_list()?;
            return Ok(Simple::Stmt(Stmt::Assign(Box::new(AssignStmt { lhs, op, rhs }))));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("1 expression"));
        }
        let Some(x) = lhs.pop() else {
            return Err(self.error_expected("expression"));
        };

        let stmt = match (self.kind(), x) {
            (TokenKind::Colon, Expr::Ident(label)) if mode == SimpleMode::LabelOk => {
                self.next();
                let stmt = if self.kind() == TokenKind::RBrace {
                    Stmt::Empty(self.span())
                } else {
                    self.parse_stmt()?
                };
                Stmt::Labeled(Box::new(LabeledStmt { label, stmt }))
            }
            (TokenKind::Arrow, chan) => {
                self.next();
                let value = self.parse_expr()?;
                Stmt::Send(Box::new(SendStmt { chan, value }))
            }
            (TokenKind::Inc | TokenKind::Dec, expr) => {
                let inc = self.next().kind == TokenKind::Inc;
                Stmt::IncDec(Box::new(IncDecStmt { expr, inc }))
            }
            (_, x) => Stmt::Expr(x),
        };
        Ok(Simple::Stmt(stmt))
    }

    /// Convert the statement in a condition position back into its
    /// expression.
    fn condition(&self, stmt: Stmt, what: &str) -> PResult<Expr> {
        match stmt {
            Stmt::Expr(expr) => Ok(expr),
            _ => Err(self.error(format!(
                "cannot use statement as {} (missing parentheses around composite literal?)",
                what
            ))),
        }
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::If)?;
        let outer = self.expr_lev;
        self.expr_lev = -1;

        if self.kind() == TokenKind::LBrace {
            return Err(self.error("missing condition in if statement"));
        }

        let mut init = None;
        let mut cond = None;
        if self.kind() != TokenKind::Semicolon {
            cond = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
        }
        if self.got(TokenKind::Semicolon) {
            init = cond.take();
            if self.kind() == TokenKind::LBrace {
                return Err(self.error("missing condition in if statement"));
            }
            cond = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
        }
        self.expr_lev = outer;

        let Some(cond) = cond else {
            return Err(self.error("missing condition in if statement"));
        };
        let cond = self.condition(cond, "value")?;
        let then = self.parse_block()?;

        let els = if self.got(TokenKind::Else) {
            match self.kind() {
                TokenKind::If => Some(self.parse_if_stmt()?),
                TokenKind::LBrace => Some(Stmt::Block(self.parse_block()?)),
                _ => return Err(self.error("else must be followed by if or statement block")),
            }
        } else {
            None
        };

        Ok(Stmt::If(Box::new(IfStmt {
            init,
            cond,
            then,
            els,
        })))
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::Switch)?;
        let outer = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        let mut tag = None;
        if self.kind() != TokenKind::LBrace {
            if self.kind() != TokenKind::Semicolon {
                tag = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
            }
            if self.got(TokenKind::Semicolon) {
                init = tag.take();
                if self.kind() != TokenKind::LBrace {
                    tag = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
                }
            }
        }
        self.expr_lev = outer;

        self.expect(TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect(TokenKind::RBrace)?;

        match tag.map(type_switch_guard) {
            Some(Ok((binding, subject))) => Ok(Stmt::TypeSwitch(Box::new(TypeSwitchStmt {
                init,
                binding,
                subject,
                clauses,
            }))),
            Some(Err(stmt)) => {
                let tag = self.condition(stmt, "switch expression")?;
                Ok(Stmt::Switch(Box::new(SwitchStmt {
                    init,
                    tag: Some(tag),
                    clauses,
                })))
            }
            None => Ok(Stmt::Switch(Box::new(SwitchStmt {
                init,
                tag: None,
                clauses,
            }))),
        }
    }

    fn parse_case_clause(&mut self) -> PResult<CaseClause> {
        let (exprs, is_default) = if self.got(TokenKind::Case) {
            (self.parse_expr_list()?, false)
        } else {
            self.expect(TokenKind::Default)?;
            (Vec::new(), true)
        };
        self.expect(TokenKind::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(CaseClause {
            exprs,
            is_default,
            body,
        })
    }

    fn parse_select_stmt(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::Select)?;
        self.expect(TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            let comm = if self.got(TokenKind::Case) {
                Some(self.parse_simple_stmt_only(SimpleMode::Basic)?)
            } else {
                self.expect(TokenKind::Default)?;
                None
            };
            self.expect(TokenKind::Colon)?;
            let body = self.parse_stmt_list()?;
            clauses.push(CommClause { comm, body });
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Select(Box::new(SelectStmt { clauses })))
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::For)?;
        let outer = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut range = None;

        if self.kind() != TokenKind::LBrace {
            let mut header = None;
            if self.kind() != TokenKind::Semicolon {
                match self.parse_simple_stmt(SimpleMode::RangeOk)? {
                    Simple::Stmt(stmt) => header = Some(stmt),
                    range_clause @ Simple::Range { .. } => range = Some(range_clause),
                }
            }
            if range.is_none() && self.kind() == TokenKind::Semicolon {
                self.next();
                init = header.take();
                if self.kind() != TokenKind::Semicolon {
                    cond = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
                }
                self.expect(TokenKind::Semicolon)?;
                if self.kind() != TokenKind::LBrace {
                    post = Some(self.parse_simple_stmt_only(SimpleMode::Basic)?);
                }
            } else if header.is_some() {
                cond = header;
            }
        }
        self.expr_lev = outer;

        let body = self.parse_block()?;

        if let Some(Simple::Range {
            key,
            value,
            define,
            expr,
        }) = range
        {
            return Ok(Stmt::Range(Box::new(RangeStmt {
                key,
                value,
                define,
                expr,
                body,
            })));
        }

        let cond = match cond {
            Some(stmt) => Some(self.condition(stmt, "for loop condition")?),
            None => None,
        };
        Ok(Stmt::For(Box::new(ForStmt {
            init,
            cond,
            post,
            body,
        })))
    }
}

/// Split `x := y.(type)` or `y.(type)` into its binding and subject; any
/// other statement is handed back.
fn type_switch_guard(stmt: Stmt) -> Result<(Option<Ident>, Expr), Stmt> {
    match stmt {
        Stmt::Expr(Expr::TypeAssert(assert)) if assert.ty.is_none() => Ok((None, assert.expr)),
        Stmt::Assign(assign) if is_type_switch_define(&assign) => {
            let AssignStmt { mut lhs, op, mut rhs } = *assign;
            match (lhs.pop(), rhs.pop()) {
                (Some(Expr::Ident(binding)), Some(Expr::TypeAssert(assert))) => {
                    Ok((Some(binding), assert.expr))
                }
                (binding, subject) => Err(Stmt::Assign(Box::new(AssignStmt {
                    lhs: binding.into_iter().collect(),
                    op,
                    rhs: subject.into_iter().collect(),
                }))),
            }
        }
        other => Err(other),
    }
}

fn is_type_switch_define(assign: &AssignStmt) -> bool {
    assign.op == AssignOp::Define
        && matches!(assign.lhs.as_slice(), [Expr::Ident(_)])
        && matches!(assign.rhs.as_slice(), [Expr::TypeAssert(assert)] if assert.ty.is_none())
}
