//! Go tokenizer.
//!
//! Raw tokens come from a `logos` lexer; [`tokenize`] then drops comments and
//! newlines, inserting the semicolons Go's grammar expects at line ends.

use logos::Logos;

use crate::core::{
    errors::{SyntaxError, SyntaxErrors},
    source::{SourceFile, Span},
};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x{FEFF}]+")]
pub enum TokenKind {
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?([pP][+-]?[0-9_]+)?i?")]
    #[regex(r"0[oO][0-7_]+i?")]
    #[regex(r"0[bB][01_]+i?")]
    Number,
    #[regex(r"'([^'\\\n]|\\[^\n])+'")]
    Char,
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,
    #[regex(r"`[^`]*`")]
    RawString,

    // Literals missing their terminator. Matching them explicitly gives a
    // precise message instead of a cascade of invalid characters.
    #[regex(r#""([^"\\\n]|\\[^\n])*"#, priority = 1)]
    UnterminatedString,
    #[regex(r"`[^`]*", priority = 1)]
    UnterminatedRawString,
    #[regex(r"/\*([^*]|\*+[^*/])*\**", priority = 1)]
    UnterminatedComment,

    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Quo,
    #[token("%")]
    Rem,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("^")]
    Xor,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    QuoAssign,
    #[token("%=")]
    RemAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    Eql,
    #[token("<")]
    Lss,
    #[token(">")]
    Gtr,
    #[token("=")]
    Assign,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,
    #[token("!=")]
    Neq,
    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,
    #[token(":=")]
    Define,
    #[token("...")]
    Ellipsis,
    #[token("(")]
    LParen,
    #[token("[")]
    LBrack,
    #[token("{")]
    LBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token(")")]
    RParen,
    #[token("]")]
    RBrack,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,

    /// End of input; never produced by `logos`, appended by [`tokenize`].
    Eof,
}

impl TokenKind {
    /// Whether a line ending right after this token gets a semicolon.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBrack
                | TokenKind::RBrace
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::RawString
        )
    }

    /// Token text as Go diagnostics spell it.
    pub fn text(self) -> &'static str {
        match self {
            TokenKind::Newline => "newline",
            TokenKind::LineComment | TokenKind::BlockComment => "COMMENT",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::Char => "CHAR",
            TokenKind::String | TokenKind::RawString => "STRING",
            TokenKind::UnterminatedString
            | TokenKind::UnterminatedRawString
            | TokenKind::UnterminatedComment => "ILLEGAL",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Chan => "chan",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Defer => "defer",
            TokenKind::Else => "else",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::Go => "go",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Interface => "interface",
            TokenKind::Map => "map",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::Select => "select",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Quo => "/",
            TokenKind::Rem => "%",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Xor => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::AndNot => "&^",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::QuoAssign => "/=",
            TokenKind::RemAssign => "%=",
            TokenKind::AndAssign => "&=",
            TokenKind::OrAssign => "|=",
            TokenKind::XorAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::AndNotAssign => "&^=",
            TokenKind::LogicalAnd => "&&",
            TokenKind::LogicalOr => "||",
            TokenKind::Arrow => "<-",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Eql => "==",
            TokenKind::Lss => "<",
            TokenKind::Gtr => ">",
            TokenKind::Assign => "=",
            TokenKind::Not => "!",
            TokenKind::Tilde => "~",
            TokenKind::Neq => "!=",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::Define => ":=",
            TokenKind::Ellipsis => "...",
            TokenKind::LParen => "(",
            TokenKind::LBrack => "[",
            TokenKind::LBrace => "{",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::RParen => ")",
            TokenKind::RBrack => "]",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Eof => "EOF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Semicolons inserted at a line end have an empty span.
    pub fn is_implicit_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.span.lo == self.span.hi
    }
}

/// Tokenize a whole file, reporting every invalid token.
///
/// The returned list always ends with [`TokenKind::Eof`].
pub fn tokenize(source: &SourceFile) -> Result<Vec<Token>, SyntaxErrors> {
    let text = source.text();
    let mut tokens = Vec::new();
    let mut errors = SyntaxErrors::default();
    let mut last: Option<TokenKind> = None;
    let mut lexer = TokenKind::lexer(text);

    let needs_semicolon = |last: Option<TokenKind>| last.is_some_and(TokenKind::ends_statement);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(range.start, range.end);
        let kind = match result {
            Ok(kind) => kind,
            Err(()) => {
                let ch = lexer.slice().chars().next().unwrap_or('\u{FFFD}');
                errors.push(SyntaxError::at(
                    source,
                    span.lo,
                    format!("illegal character U+{:04X} '{}'", ch as u32, ch),
                ));
                continue;
            }
        };

        match kind {
            TokenKind::Newline => {
                if needs_semicolon(last) {
                    tokens.push(implicit_semicolon(span.lo));
                    last = Some(TokenKind::Semicolon);
                }
            }
            TokenKind::LineComment => {}
            TokenKind::BlockComment => {
                if lexer.slice().contains('\n') && needs_semicolon(last) {
                    tokens.push(implicit_semicolon(span.lo));
                    last = Some(TokenKind::Semicolon);
                }
            }
            TokenKind::UnterminatedString | TokenKind::UnterminatedRawString => {
                errors.push(SyntaxError::at(
                    source,
                    span.lo,
                    "string literal not terminated",
                ));
                if kind == TokenKind::UnterminatedRawString {
                    break;
                }
            }
            TokenKind::UnterminatedComment => {
                errors.push(SyntaxError::at(source, span.lo, "comment not terminated"));
                break;
            }
            _ => {
                tokens.push(Token { kind, span });
                last = Some(kind);
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    if needs_semicolon(last) {
        tokens.push(implicit_semicolon(text.len()));
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(text.len(), text.len()),
    });
    Ok(tokens)
}

fn implicit_semicolon(offset: usize) -> Token {
    Token {
        kind: TokenKind::Semicolon,
        span: Span::new(offset, offset),
    }
}
