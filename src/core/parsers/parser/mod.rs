//! Recursive-descent Go parser.
//!
//! The parser works on the token list produced by [`tokenize`] and stops at
//! the first grammar error. It follows the Go grammar closely, including the
//! composite-literal ambiguity: inside `if`, `for` and `switch` headers the
//! expression level is negative, and a bare type name followed by `{` starts
//! the block instead of a literal.

mod decl;
mod expr;
mod stmt;
mod types;

use crate::core::{
    ast::{File, NodeId, NodeIds},
    errors::{SyntaxError, SyntaxErrors},
    source::{SourceFile, Span},
};

use super::lexer::{Token, TokenKind, tokenize};

type PResult<T> = Result<T, SyntaxError>;

/// Parse one Go source file.
///
/// Composite literal ids are drawn from `ids`, so several files parsed with
/// the same generator get unit-wide unique ids.
pub fn parse_file(source: &SourceFile, ids: &mut NodeIds) -> Result<File, SyntaxErrors> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(source, tokens, ids);
    parser.parse_file().map_err(SyntaxErrors::from)
}

struct Parser<'a> {
    source: &'a SourceFile,
    tokens: Vec<Token>,
    pos: usize,
    /// Below zero inside control clauses, where `T {` is not a literal.
    expr_lev: i32,
    ids: &'a mut NodeIds,
}

impl<'a> Parser<'a> {
    fn new(source: &'a SourceFile, tokens: Vec<Token>, ids: &'a mut NodeIds) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            expr_lev: 0,
            ids,
        }
    }

    fn token(&self) -> Token {
        self.peek_at(0)
    }

    fn kind(&self) -> TokenKind {
        self.token().kind
    }

    fn peek(&self) -> TokenKind {
        self.peek_at(1).kind
    }

    fn peek_at(&self, n: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn span(&self) -> Span {
        self.token().span
    }

    fn text(&self, span: Span) -> &'a str {
        &self.source.text()[span.lo..span.hi]
    }

    /// End offset of the previously consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.hi
        }
    }

    fn next(&mut self) -> Token {
        let token = self.token();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn got(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.kind() == kind {
            Ok(self.next().span)
        } else {
            Err(self.error_expected(&format!("'{}'", kind.text())))
        }
    }

    /// Like [`Self::expect`], but names the construct a missing closing
    /// delimiter belongs to when the line ended early.
    fn expect_closing(&mut self, kind: TokenKind, context: &str) -> PResult<Span> {
        if self.kind() != kind && self.token().is_implicit_semicolon() {
            return Err(self.error(format!("missing ',' before newline in {}", context)));
        }
        self.expect(kind)
    }

    /// A semicolon is optional before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.kind() {
            TokenKind::RParen | TokenKind::RBrace => Ok(()),
            TokenKind::Semicolon => {
                self.next();
                Ok(())
            }
            _ => Err(self.error_expected("';'")),
        }
    }

    /// Span from `lo` to the end of the previously consumed token.
    fn span_from(&self, lo: Span) -> Span {
        Span::new(lo.lo, self.prev_end().max(lo.hi))
    }

    fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        self.error_at(self.span().lo, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.source, offset, message)
    }

    fn error_expected(&self, what: &str) -> SyntaxError {
        let token = self.token();
        let found = if token.is_implicit_semicolon() {
            "newline".to_string()
        } else if token.kind.is_literal() {
            self.text(token.span).to_string()
        } else {
            format!("'{}'", token.kind.text())
        };
        self.error(format!("expected {}, found {}", what, found))
    }
}

#[cfg(test)]
mod tests;
