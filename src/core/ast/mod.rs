//! Go syntax tree.
//!
//! The tree mirrors Go's own: types are expressions (`[]int`, `*T`,
//! `map[K]V`), so conversions and composite literal types share one node
//! family. Every node carries a byte [`Span`]; composite literals also carry a
//! [`NodeId`] that the type resolver uses as a side-table key.

pub mod visit;

use crate::core::source::Span;

/// Identity of a composite literal within one compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Hands out unit-wide unique [`NodeId`]s across the files of a package.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

#[derive(Debug, Clone)]
pub struct File {
    pub package: Ident,
    pub decls: Vec<Decl>,
}

impl File {
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .flat_map(|decl| {
                let specs: &[Spec] = match decl {
                    Decl::Gen(gen_decl) => &gen_decl.specs,
                    Decl::Func(_) => &[],
                };
                specs
            })
            .filter_map(|spec| match spec {
                Spec::Import(import) => Some(import),
                _ => None,
            })
    }
}

#[derive(Debug, Clone)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone)]
pub struct GenDecl {
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    /// Explicit name: an identifier, `_`, or `.`.
    pub name: Option<Ident>,
    pub path: BasicLit,
}

impl ImportSpec {
    /// Import path with its quotes removed.
    pub fn path_value(&self) -> &str {
        self.path
            .value
            .trim_matches(|c| c == '"' || c == '`')
    }
}

/// `const` or `var` spec.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub is_alias: bool,
    pub ty: Expr,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub recv: Option<Vec<Field>>,
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub sig: FuncType,
    pub body: Option<Block>,
    pub span: Span,
}

/// A parameter, result, struct field or interface method.
///
/// Anonymous parameters and embedded struct fields have no names.
#[derive(Debug, Clone)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(GenDecl),
    Labeled(Box<LabeledStmt>),
    Expr(Expr),
    Send(Box<SendStmt>),
    IncDec(Box<IncDecStmt>),
    Assign(Box<AssignStmt>),
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    Branch(BranchStmt),
    Block(Block),
    If(Box<IfStmt>),
    Switch(Box<SwitchStmt>),
    TypeSwitch(Box<TypeSwitchStmt>),
    Select(Box<SelectStmt>),
    For(Box<ForStmt>),
    Range(Box<RangeStmt>),
    Empty(Span),
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: Ident,
    pub stmt: Stmt,
}

#[derive(Debug, Clone)]
pub struct SendStmt {
    pub chan: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct IncDecStmt {
    pub expr: Expr,
    pub inc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`, `<<=`, ...
    Compound,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone)]
pub struct BranchStmt {
    pub kind: BranchKind,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub init: Option<Stmt>,
    pub cond: Expr,
    pub then: Block,
    /// Either another `if` or a block.
    pub els: Option<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CaseClause {
    /// Empty for `default`.
    pub exprs: Vec<Expr>,
    pub is_default: bool,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub init: Option<Stmt>,
    pub tag: Option<Expr>,
    pub clauses: Vec<CaseClause>,
}

/// `switch [init;] [x :=] subject.(type) { ... }`
#[derive(Debug, Clone)]
pub struct TypeSwitchStmt {
    pub init: Option<Stmt>,
    pub binding: Option<Ident>,
    pub subject: Expr,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone)]
pub struct CommClause {
    /// `None` for `default`.
    pub comm: Option<Stmt>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub clauses: Vec<CommClause>,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub post: Option<Stmt>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub define: bool,
    pub expr: Expr,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(Box<CompositeLit>),
    FuncLit(Box<FuncLit>),
    Paren(Box<ParenExpr>),
    Selector(Box<SelectorExpr>),
    Index(Box<IndexExpr>),
    Slice(Box<SliceExpr>),
    TypeAssert(Box<TypeAssertExpr>),
    Call(Box<CallExpr>),
    Star(Box<StarExpr>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    KeyValue(Box<KeyValueExpr>),
    Ellipsis(Box<EllipsisExpr>),
    ArrayType(Box<ArrayType>),
    StructType(Box<StructType>),
    FuncType(Box<FuncType>),
    InterfaceType(Box<InterfaceType>),
    MapType(Box<MapType>),
    ChanType(Box<ChanType>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(e) => e.span,
            Expr::BasicLit(e) => e.span,
            Expr::CompositeLit(e) => e.span,
            Expr::FuncLit(e) => e.span,
            Expr::Paren(e) => e.span,
            Expr::Selector(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Slice(e) => e.span,
            Expr::TypeAssert(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Star(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::KeyValue(e) => e.span,
            Expr::Ellipsis(e) => e.span,
            Expr::ArrayType(e) => e.span,
            Expr::StructType(e) => e.span,
            Expr::FuncType(e) => e.span,
            Expr::InterfaceType(e) => e.span,
            Expr::MapType(e) => e.span,
            Expr::ChanType(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = &paren.expr;
        }
        expr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Number,
    Char,
    String,
}

#[derive(Debug, Clone)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Literal text as written, quotes included.
    pub value: String,
    pub span: Span,
}

/// `T{a, b}`, `T{X: a}` or an elided `{a, b}` inside another literal.
#[derive(Debug, Clone)]
pub struct CompositeLit {
    pub id: NodeId,
    /// `None` when the type is elided.
    pub ty: Option<Expr>,
    pub elts: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FuncLit {
    pub sig: FuncType,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub expr: Expr,
    pub sel: Ident,
    pub span: Span,
}

/// `x[i]`, or a generic instantiation `G[A, B]`.
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub expr: Expr,
    pub indices: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SliceExpr {
    pub expr: Expr,
    pub low: Option<Expr>,
    pub high: Option<Expr>,
    pub max: Option<Expr>,
    pub span: Span,
}

/// `x.(T)`; `ty` is `None` for the `x.(type)` guard of a type switch.
#[derive(Debug, Clone)]
pub struct TypeAssertExpr {
    pub expr: Expr,
    pub ty: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub func: Expr,
    pub args: Vec<Expr>,
    pub has_ellipsis: bool,
    pub span: Span,
}

/// `*x`: a dereference or a pointer type.
#[derive(Debug, Clone)]
pub struct StarExpr {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Xor,
    Addr,
    Recv,
    Tilde,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LogicalOr,
    LogicalAnd,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct KeyValueExpr {
    pub key: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `...T` in a variadic parameter, or the `...` length of `[...]T`.
#[derive(Debug, Clone)]
pub struct EllipsisExpr {
    pub elem: Option<Expr>,
    pub span: Span,
}

/// `[N]T`, `[...]T`, or a slice type `[]T` when `len` is `None`.
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub len: Option<Expr>,
    pub elem: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructType {
    pub fields: Vec<Field>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    /// Methods carry one name and a [`FuncType`].
    pub methods: Vec<Field>,
    /// Embedded interfaces and type-set terms (`~int | string`).
    pub embeds: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MapType {
    pub key: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone)]
pub struct ChanType {
    pub dir: ChanDir,
    pub elem: Expr,
    pub span: Span,
}
