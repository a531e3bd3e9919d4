//! Static resolution of composite literal types.
//!
//! Resolution runs in three steps. Every package-level type declaration of
//! the unit and of its imports is declared first, so order within
//! and across files does not matter. Defined types are then given their
//! definitions, and aliases are resolved lazily on first use. Finally the
//! target files are walked with a stack of block scopes, and every composite
//! literal whose type can be determined is recorded.

use std::collections::HashMap;

use crate::core::{
    ast::{
        AssignOp, Block, CaseClause, CommClause, CompositeLit, Decl, Expr, Field, File, FuncDecl,
        FuncLit, GenDecl, Ident, NodeId, Spec, Stmt, StructType, TypeSpec,
        visit::{
            Visit, walk_block, walk_case_clause, walk_comm_clause, walk_gen_decl, walk_stmt,
        },
    },
    importer::Imports,
    package::Unit,
};

use super::{Type, TypeId, TypeInfo, TypeTable};

const PREDECLARED_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Predeclared interface types.
const PREDECLARED_INTERFACES: &[&str] = &["any", "comparable", "error"];

/// What a name refers to in some scope.
#[derive(Debug, Clone, Copy)]
enum Entity {
    Type(TypeId),
    /// Package-level alias, resolved on first use.
    Alias(usize),
    /// An imported package, by index into the resolver's packages.
    Package(usize),
    /// Variables, constants and functions.
    Value,
    TypeParam,
}

/// Where a declaration's names are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Context {
    package: usize,
    file: usize,
}

#[derive(Debug, Clone, Copy)]
enum AliasState {
    Pending,
    InProgress,
    Done(TypeId),
}

struct AliasDecl<'a> {
    spec: &'a TypeSpec,
    context: Context,
    state: AliasState,
}

struct PackageScope<'a> {
    name: String,
    files: Vec<&'a File>,
    names: HashMap<String, Entity>,
    /// Import names, per file.
    file_names: Vec<HashMap<String, Entity>>,
}

/// A generic defined type, re-resolved for each instantiation.
#[derive(Clone, Copy)]
struct GenericDecl<'a> {
    spec: &'a TypeSpec,
    context: Context,
}

/// A defined type waiting for its definition.
struct PendingType<'a> {
    id: TypeId,
    spec: &'a TypeSpec,
    context: Context,
}

/// Resolve the composite literal types of the unit's target files.
pub fn resolve(unit: &Unit, imports: &Imports) -> TypeInfo {
    let mut packages = vec![PackageScope::new(
        unit.package.clone(),
        unit.files.iter().map(|file| &file.ast).collect(),
    )];
    packages.extend(imports.packages.iter().map(|package| {
        PackageScope::new(
            package.name.clone(),
            package.files.iter().map(|file| &file.ast).collect(),
        )
    }));

    let mut resolver = Resolver::new(packages);
    let pending = resolver.declare_packages();
    resolver.bind_imports(imports);
    resolver.define_types(pending);

    for &target in unit.target_indices() {
        resolver.context = Context {
            package: 0,
            file: target,
        };
        resolver.visit_file(&unit.files[target].ast);
    }

    TypeInfo {
        table: resolver.table,
        literals: resolver.literals,
    }
}

impl<'a> PackageScope<'a> {
    fn new(name: String, files: Vec<&'a File>) -> Self {
        Self {
            name,
            files,
            names: HashMap::new(),
            file_names: Vec::new(),
        }
    }
}

struct Resolver<'a> {
    table: TypeTable,
    universe: HashMap<&'static str, TypeId>,
    packages: Vec<PackageScope<'a>>,
    aliases: Vec<AliasDecl<'a>>,
    generics: HashMap<TypeId, GenericDecl<'a>>,
    /// Generic types whose instantiation is being resolved.
    instantiating: Vec<TypeId>,
    context: Context,
    blocks: Vec<HashMap<String, Entity>>,
    literals: HashMap<NodeId, TypeId>,
}

impl<'a> Resolver<'a> {
    fn new(packages: Vec<PackageScope<'a>>) -> Self {
        let mut table = TypeTable::new();
        let mut universe = HashMap::new();
        for &name in PREDECLARED_TYPES {
            universe.insert(name, table.add(Type::Basic(name)));
        }
        for &name in PREDECLARED_INTERFACES {
            universe.insert(name, table.opaque());
        }

        Self {
            table,
            universe,
            packages,
            aliases: Vec::new(),
            generics: HashMap::new(),
            instantiating: Vec::new(),
            context: Context {
                package: 0,
                file: 0,
            },
            blocks: Vec::new(),
            literals: HashMap::new(),
        }
    }

    /// Bind the package-level names of every package.
    fn declare_packages(&mut self) -> Vec<PendingType<'a>> {
        let mut pending = Vec::new();

        for package in 0..self.packages.len() {
            let files = self.packages[package].files.clone();
            for (file, ast) in files.into_iter().enumerate() {
                let context = Context { package, file };
                for decl in &ast.decls {
                    match decl {
                        Decl::Gen(gen_decl) => {
                            self.declare_gen(gen_decl, context, &mut pending);
                        }
                        Decl::Func(func) if func.recv.is_none() => {
                            self.declare_package_name(package, &func.name, Entity::Value);
                        }
                        Decl::Func(_) => {}
                    }
                }
            }
        }

        pending
    }

    fn declare_gen(
        &mut self,
        decl: &'a GenDecl,
        context: Context,
        pending: &mut Vec<PendingType<'a>>,
    ) {
        for spec in &decl.specs {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(value) => {
                    for name in &value.names {
                        self.declare_package_name(context.package, name, Entity::Value);
                    }
                }
                Spec::Type(spec) if spec.is_alias => {
                    self.aliases.push(AliasDecl {
                        spec,
                        context,
                        state: AliasState::Pending,
                    });
                    let alias = Entity::Alias(self.aliases.len() - 1);
                    self.declare_package_name(context.package, &spec.name, alias);
                }
                Spec::Type(spec) => {
                    let name = self.qualified_name(context.package, &spec.name.name);
                    let id = self.table.add(Type::Named {
                        name,
                        definition: None,
                    });
                    self.declare_package_name(context.package, &spec.name, Entity::Type(id));
                    if !spec.type_params.is_empty() {
                        self.generics.insert(id, GenericDecl { spec, context });
                    }
                    pending.push(PendingType { id, spec, context });
                }
            }
        }
    }

    fn declare_package_name(&mut self, package: usize, name: &Ident, entity: Entity) {
        if !name.is_blank() {
            self.packages[package]
                .names
                .insert(name.name.clone(), entity);
        }
    }

    fn qualified_name(&self, package: usize, name: &str) -> String {
        if package == 0 {
            name.to_string()
        } else {
            format!("{}.{}", self.packages[package].name, name)
        }
    }

    /// Build the per-file import scopes. Imports that were not loaded are
    /// left unbound.
    fn bind_imports(&mut self, imports: &Imports) {
        for package in 0..self.packages.len() {
            let files = self.packages[package].files.clone();
            let mut file_names = Vec::with_capacity(files.len());
            for ast in files {
                let mut names = HashMap::new();
                for spec in ast.imports() {
                    let Some(index) = imports.index_of(spec.path_value()) else {
                        continue;
                    };
                    let imported = index + 1;
                    match spec.name.as_ref().map(|name| name.name.as_str()) {
                        Some("_") => {}
                        Some(".") => {
                            for (name, entity) in &self.packages[imported].names {
                                let exported = name.chars().next().is_some_and(char::is_uppercase);
                                if exported && matches!(entity, Entity::Type(_) | Entity::Alias(_)) {
                                    names.insert(name.clone(), *entity);
                                }
                            }
                        }
                        Some(name) => {
                            names.insert(name.to_string(), Entity::Package(imported));
                        }
                        None => {
                            let name = self.packages[imported].name.clone();
                            names.insert(name, Entity::Package(imported));
                        }
                    }
                }
                file_names.push(names);
            }
            self.packages[package].file_names = file_names;
        }
    }

    fn define_types(&mut self, pending: Vec<PendingType<'a>>) {
        for PendingType { id, spec, context } in pending {
            let definition = self.in_context(context, |resolver| {
                resolver.push_scope();
                resolver.bind_type_params(&spec.type_params);
                resolver.resolve_type(&spec.ty)
            });
            self.table.define(id, definition);
        }
    }

    /// Run `f` with package-level scoping for `context`.
    fn in_context<T>(&mut self, context: Context, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved_context = std::mem::replace(&mut self.context, context);
        let saved_blocks = std::mem::take(&mut self.blocks);
        let result = f(self);
        self.context = saved_context;
        self.blocks = saved_blocks;
        result
    }

    fn push_scope(&mut self) {
        self.blocks.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.blocks.pop();
    }

    fn bind(&mut self, name: &Ident, entity: Entity) {
        if name.is_blank() {
            return;
        }
        if let Some(block) = self.blocks.last_mut() {
            block.insert(name.name.clone(), entity);
        }
    }

    fn bind_fields(&mut self, fields: &[Field], entity: Entity) {
        for field in fields {
            for name in &field.names {
                self.bind(name, entity);
            }
        }
    }

    fn bind_type_params(&mut self, fields: &[Field]) {
        self.bind_fields(fields, Entity::TypeParam);
    }

    fn lookup(&self, name: &str) -> Option<Entity> {
        if let Some(entity) = self.blocks.iter().rev().find_map(|block| block.get(name)) {
            return Some(*entity);
        }
        let package = &self.packages[self.context.package];
        package
            .file_names
            .get(self.context.file)
            .and_then(|names| names.get(name))
            .or_else(|| package.names.get(name))
            .copied()
            .or_else(|| self.universe.get(name).map(|id| Entity::Type(*id)))
    }

    fn entity_type(&mut self, entity: Option<Entity>) -> TypeId {
        match entity {
            Some(Entity::Type(id)) => id,
            Some(Entity::Alias(alias)) => self.resolve_alias(alias),
            Some(Entity::TypeParam) => self.table.opaque(),
            Some(Entity::Package(_) | Entity::Value) | None => self.table.invalid(),
        }
    }

    fn resolve_alias(&mut self, alias: usize) -> TypeId {
        match self.aliases[alias].state {
            AliasState::Done(id) => return id,
            AliasState::InProgress => return self.table.invalid(),
            AliasState::Pending => {}
        }
        self.aliases[alias].state = AliasState::InProgress;
        let spec = self.aliases[alias].spec;
        let context = self.aliases[alias].context;
        let id = self.in_context(context, |resolver| resolver.resolve_type(&spec.ty));
        self.aliases[alias].state = AliasState::Done(id);
        id
    }

    /// The type denoted by a type expression.
    fn resolve_type(&mut self, expr: &Expr) -> TypeId {
        match expr {
            Expr::Ident(ident) => {
                let entity = self.lookup(&ident.name);
                self.entity_type(entity)
            }
            Expr::Selector(selector) => {
                let Expr::Ident(qualifier) = &selector.expr else {
                    return self.table.invalid();
                };
                let Some(Entity::Package(package)) = self.lookup(&qualifier.name) else {
                    return self.table.invalid();
                };
                if !selector.sel.is_exported() {
                    return self.table.invalid();
                }
                let entity = self.packages[package].names.get(&selector.sel.name).copied();
                self.entity_type(entity)
            }
            Expr::Paren(paren) => self.resolve_type(&paren.expr),
            Expr::Index(index) => {
                let generic = self.resolve_type(&index.expr);
                let args = index
                    .indices
                    .iter()
                    .map(|arg| self.resolve_type(arg))
                    .collect();
                self.instantiate(generic, args)
            }
            Expr::Star(star) => {
                let elem = self.resolve_type(&star.expr);
                self.table.add(Type::Pointer(elem))
            }
            Expr::ArrayType(array) => {
                let elem = self.resolve_type(&array.elem);
                match array.len {
                    None => self.table.add(Type::Slice(elem)),
                    Some(_) => self.table.add(Type::Array(elem)),
                }
            }
            Expr::MapType(map) => {
                let key = self.resolve_type(&map.key);
                let value = self.resolve_type(&map.value);
                self.table.add(Type::Map { key, value })
            }
            Expr::StructType(st) => self.struct_type(st),
            Expr::FuncType(_) | Expr::ChanType(_) | Expr::InterfaceType(_) => self.table.opaque(),
            _ => self.table.invalid(),
        }
    }

    /// `generic` with `args` substituted for its type parameters. The
    /// instance keeps the generic type's name. Recursive instantiations
    /// and argument count mismatches fall back to the generic type itself.
    fn instantiate(&mut self, generic: TypeId, args: Vec<TypeId>) -> TypeId {
        let Some(GenericDecl { spec, context }) = self.generics.get(&generic).copied() else {
            return generic;
        };
        let params: Vec<&Ident> = spec
            .type_params
            .iter()
            .flat_map(|field| &field.names)
            .collect();
        if params.len() != args.len() || self.instantiating.contains(&generic) {
            return generic;
        }
        let Type::Named { name, .. } = self.table.get(generic) else {
            return generic;
        };
        let name = name.clone();

        self.instantiating.push(generic);
        let definition = self.in_context(context, |resolver| {
            resolver.push_scope();
            for (param, arg) in params.into_iter().zip(args) {
                resolver.bind(param, Entity::Type(arg));
            }
            resolver.resolve_type(&spec.ty)
        });
        self.instantiating.pop();

        let instance = self.table.add(Type::Named {
            name,
            definition: None,
        });
        self.table.define(instance, definition);
        instance
    }

    fn struct_type(&mut self, st: &StructType) -> TypeId {
        let mut fields = Vec::new();
        for field in &st.fields {
            if field.names.is_empty() {
                let Some(name) = embedded_name(&field.ty) else {
                    return self.table.invalid();
                };
                fields.push(name.to_string());
            } else {
                fields.extend(field.names.iter().map(|name| name.name.clone()));
            }
        }
        self.table.add(Type::Struct(fields))
    }

    /// Key and element types for the elements of a literal of type `ty`.
    fn element_hints(&self, ty: TypeId) -> (Option<TypeId>, Option<TypeId>) {
        let base = self.table.underlying(self.table.deref(ty));
        match self.table.get(base) {
            Type::Slice(elem) | Type::Array(elem) => (None, Some(*elem)),
            Type::Map { key, value } => (Some(*key), Some(*value)),
            _ => (None, None),
        }
    }

    /// Visit a literal whose elided type, if any, is `hint`.
    fn visit_literal(&mut self, lit: &CompositeLit, hint: Option<TypeId>) {
        let ty = match &lit.ty {
            Some(expr) => {
                self.visit_expr(expr);
                self.resolve_type(expr)
            }
            None => hint.unwrap_or(self.table.invalid()),
        };
        // Named types caught in a definition cycle are as unknown as
        // undeclared ones.
        if !self.table.is_invalid(self.table.underlying(ty)) {
            self.literals.insert(lit.id, ty);
        }

        let (key_hint, elem_hint) = self.element_hints(ty);
        for elt in &lit.elts {
            match elt {
                Expr::KeyValue(kv) => {
                    self.visit_element(&kv.key, key_hint);
                    self.visit_element(&kv.value, elem_hint);
                }
                _ => self.visit_element(elt, elem_hint),
            }
        }
    }

    fn visit_element(&mut self, expr: &Expr, hint: Option<TypeId>) {
        match expr {
            Expr::CompositeLit(lit) if lit.ty.is_none() => self.visit_literal(lit, hint),
            _ => self.visit_expr(expr),
        }
    }

    /// Local `type` declarations. Defined types are bound before their
    /// definition is resolved so they may refer to themselves.
    fn declare_local_type(&mut self, spec: &TypeSpec) {
        if spec.is_alias {
            let id = self.resolve_type(&spec.ty);
            self.bind(&spec.name, Entity::Type(id));
            return;
        }
        let id = self.table.add(Type::Named {
            name: spec.name.name.clone(),
            definition: None,
        });
        self.bind(&spec.name, Entity::Type(id));
        let definition = self.resolve_type(&spec.ty);
        self.table.define(id, definition);
    }

    fn bind_lhs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            match expr {
                Expr::Ident(ident) => self.bind(ident, Entity::Value),
                _ => self.visit_expr(expr),
            }
        }
    }
}

/// Name of an embedded field: the type name without pointer, package
/// qualifier or type arguments.
fn embedded_name(ty: &Expr) -> Option<&str> {
    match ty {
        Expr::Ident(ident) => Some(&ident.name),
        Expr::Selector(selector) => Some(&selector.sel.name),
        Expr::Star(star) => embedded_name(&star.expr),
        Expr::Index(index) => embedded_name(&index.expr),
        Expr::Paren(paren) => embedded_name(&paren.expr),
        _ => None,
    }
}

/// Type parameters declared by a receiver such as `(l *List[T])`.
fn receiver_type_params(ty: &Expr) -> Vec<&Ident> {
    match ty.unparen() {
        Expr::Star(star) => receiver_type_params(&star.expr),
        Expr::Index(index) => index
            .indices
            .iter()
            .filter_map(|expr| match expr {
                Expr::Ident(ident) => Some(ident),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl Visit for Resolver<'_> {
    fn visit_gen_decl(&mut self, decl: &GenDecl) {
        if self.blocks.is_empty() {
            walk_gen_decl(self, decl);
            return;
        }

        for spec in &decl.specs {
            match spec {
                Spec::Type(spec) => self.declare_local_type(spec),
                Spec::Value(value) => {
                    for expr in &value.values {
                        self.visit_expr(expr);
                    }
                    for name in &value.names {
                        self.bind(name, Entity::Value);
                    }
                }
                Spec::Import(_) => {}
            }
        }
    }

    fn visit_func_decl(&mut self, func: &FuncDecl) {
        self.push_scope();
        for field in func.recv.iter().flatten() {
            for param in receiver_type_params(&field.ty) {
                self.bind(param, Entity::TypeParam);
            }
            for name in &field.names {
                self.bind(name, Entity::Value);
            }
        }
        self.bind_type_params(&func.type_params);
        self.bind_fields(&func.sig.params, Entity::Value);
        self.bind_fields(&func.sig.results, Entity::Value);
        if let Some(body) = &func.body {
            self.visit_block(body);
        }
        self.pop_scope();
    }

    fn visit_func_lit(&mut self, lit: &FuncLit) {
        self.push_scope();
        self.bind_fields(&lit.sig.params, Entity::Value);
        self.bind_fields(&lit.sig.results, Entity::Value);
        self.visit_block(&lit.body);
        self.pop_scope();
    }

    fn visit_block(&mut self, block: &Block) {
        self.push_scope();
        walk_block(self, block);
        self.pop_scope();
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) if assign.op == AssignOp::Define => {
                for expr in &assign.rhs {
                    self.visit_expr(expr);
                }
                self.bind_lhs(&assign.lhs);
            }
            Stmt::If(if_stmt) => {
                self.push_scope();
                if let Some(init) = &if_stmt.init {
                    self.visit_stmt(init);
                }
                self.visit_expr(&if_stmt.cond);
                self.visit_block(&if_stmt.then);
                if let Some(els) = &if_stmt.els {
                    self.visit_stmt(els);
                }
                self.pop_scope();
            }
            Stmt::Switch(switch) => {
                self.push_scope();
                if let Some(init) = &switch.init {
                    self.visit_stmt(init);
                }
                if let Some(tag) = &switch.tag {
                    self.visit_expr(tag);
                }
                for clause in &switch.clauses {
                    self.visit_case_clause(clause);
                }
                self.pop_scope();
            }
            Stmt::TypeSwitch(switch) => {
                self.push_scope();
                if let Some(init) = &switch.init {
                    self.visit_stmt(init);
                }
                self.visit_expr(&switch.subject);
                for clause in &switch.clauses {
                    self.push_scope();
                    if let Some(binding) = &switch.binding {
                        self.bind(binding, Entity::Value);
                    }
                    for stmt in &clause.body {
                        self.visit_stmt(stmt);
                    }
                    self.pop_scope();
                }
                self.pop_scope();
            }
            Stmt::For(for_stmt) => {
                self.push_scope();
                if let Some(init) = &for_stmt.init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = &for_stmt.cond {
                    self.visit_expr(cond);
                }
                if let Some(post) = &for_stmt.post {
                    self.visit_stmt(post);
                }
                self.visit_block(&for_stmt.body);
                self.pop_scope();
            }
            Stmt::Range(range) => {
                self.push_scope();
                self.visit_expr(&range.expr);
                for var in range.key.iter().chain(&range.value) {
                    match var {
                        Expr::Ident(ident) if range.define => self.bind(ident, Entity::Value),
                        _ => self.visit_expr(var),
                    }
                }
                self.visit_block(&range.body);
                self.pop_scope();
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_case_clause(&mut self, clause: &CaseClause) {
        self.push_scope();
        walk_case_clause(self, clause);
        self.pop_scope();
    }

    fn visit_comm_clause(&mut self, clause: &CommClause) {
        self.push_scope();
        walk_comm_clause(self, clause);
        self.pop_scope();
    }

    fn visit_composite_lit(&mut self, lit: &CompositeLit) {
        self.visit_literal(lit, None);
    }
}

#[cfg(test)]
mod tests;
