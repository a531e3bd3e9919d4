//! Read-only traversal over the Go syntax tree.
//!
//! Implement [`Visit`] and override only the methods you care about; call the
//! matching `walk_*` function from the override to keep descending, or omit it
//! to prune the subtree. Children are visited in source order.

use super::*;

pub trait Visit: Sized {
    fn visit_file(&mut self, file: &File) {
        walk_file(self, file);
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    fn visit_gen_decl(&mut self, decl: &GenDecl) {
        walk_gen_decl(self, decl);
    }

    fn visit_func_decl(&mut self, func: &FuncDecl) {
        walk_func_decl(self, func);
    }

    fn visit_spec(&mut self, spec: &Spec) {
        walk_spec(self, spec);
    }

    fn visit_field(&mut self, field: &Field) {
        walk_field(self, field);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_case_clause(&mut self, clause: &CaseClause) {
        walk_case_clause(self, clause);
    }

    fn visit_comm_clause(&mut self, clause: &CommClause) {
        walk_comm_clause(self, clause);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_composite_lit(&mut self, lit: &CompositeLit) {
        walk_composite_lit(self, lit);
    }

    fn visit_func_lit(&mut self, lit: &FuncLit) {
        walk_func_lit(self, lit);
    }

    fn visit_func_type(&mut self, ty: &FuncType) {
        walk_func_type(self, ty);
    }
}

pub fn walk_file<V: Visit>(v: &mut V, file: &File) {
    for decl in &file.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<V: Visit>(v: &mut V, decl: &Decl) {
    match decl {
        Decl::Gen(gen_decl) => v.visit_gen_decl(gen_decl),
        Decl::Func(func) => v.visit_func_decl(func),
    }
}

pub fn walk_gen_decl<V: Visit>(v: &mut V, decl: &GenDecl) {
    for spec in &decl.specs {
        v.visit_spec(spec);
    }
}

pub fn walk_func_decl<V: Visit>(v: &mut V, func: &FuncDecl) {
    for field in func.recv.iter().flatten() {
        v.visit_field(field);
    }
    for field in &func.type_params {
        v.visit_field(field);
    }
    v.visit_func_type(&func.sig);
    if let Some(body) = &func.body {
        v.visit_block(body);
    }
}

pub fn walk_spec<V: Visit>(v: &mut V, spec: &Spec) {
    match spec {
        Spec::Import(_) => {}
        Spec::Value(value) => {
            if let Some(ty) = &value.ty {
                v.visit_expr(ty);
            }
            for expr in &value.values {
                v.visit_expr(expr);
            }
        }
        Spec::Type(type_spec) => {
            for field in &type_spec.type_params {
                v.visit_field(field);
            }
            v.visit_expr(&type_spec.ty);
        }
    }
}

pub fn walk_field<V: Visit>(v: &mut V, field: &Field) {
    v.visit_expr(&field.ty);
}

pub fn walk_block<V: Visit>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visit>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Decl(decl) => v.visit_gen_decl(decl),
        Stmt::Labeled(labeled) => v.visit_stmt(&labeled.stmt),
        Stmt::Expr(expr) | Stmt::Go(expr) | Stmt::Defer(expr) => v.visit_expr(expr),
        Stmt::Send(send) => {
            v.visit_expr(&send.chan);
            v.visit_expr(&send.value);
        }
        Stmt::IncDec(inc_dec) => v.visit_expr(&inc_dec.expr),
        Stmt::Assign(assign) => {
            for expr in assign.lhs.iter().chain(&assign.rhs) {
                v.visit_expr(expr);
            }
        }
        Stmt::Return(results) => {
            for expr in results {
                v.visit_expr(expr);
            }
        }
        Stmt::Branch(_) | Stmt::Empty(_) => {}
        Stmt::Block(block) => v.visit_block(block),
        Stmt::If(if_stmt) => {
            if let Some(init) = &if_stmt.init {
                v.visit_stmt(init);
            }
            v.visit_expr(&if_stmt.cond);
            v.visit_block(&if_stmt.then);
            if let Some(els) = &if_stmt.els {
                v.visit_stmt(els);
            }
        }
        Stmt::Switch(switch) => {
            if let Some(init) = &switch.init {
                v.visit_stmt(init);
            }
            if let Some(tag) = &switch.tag {
                v.visit_expr(tag);
            }
            for clause in &switch.clauses {
                v.visit_case_clause(clause);
            }
        }
        Stmt::TypeSwitch(switch) => {
            if let Some(init) = &switch.init {
                v.visit_stmt(init);
            }
            v.visit_expr(&switch.subject);
            for clause in &switch.clauses {
                v.visit_case_clause(clause);
            }
        }
        Stmt::Select(select) => {
            for clause in &select.clauses {
                v.visit_comm_clause(clause);
            }
        }
        Stmt::For(for_stmt) => {
            if let Some(init) = &for_stmt.init {
                v.visit_stmt(init);
            }
            if let Some(cond) = &for_stmt.cond {
                v.visit_expr(cond);
            }
            if let Some(post) = &for_stmt.post {
                v.visit_stmt(post);
            }
            v.visit_block(&for_stmt.body);
        }
        Stmt::Range(range) => {
            for expr in range.key.iter().chain(&range.value) {
                v.visit_expr(expr);
            }
            v.visit_expr(&range.expr);
            v.visit_block(&range.body);
        }
    }
}

pub fn walk_case_clause<V: Visit>(v: &mut V, clause: &CaseClause) {
    for expr in &clause.exprs {
        v.visit_expr(expr);
    }
    for stmt in &clause.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_comm_clause<V: Visit>(v: &mut V, clause: &CommClause) {
    if let Some(comm) = &clause.comm {
        v.visit_stmt(comm);
    }
    for stmt in &clause.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_expr<V: Visit>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Ident(_) | Expr::BasicLit(_) => {}
        Expr::CompositeLit(lit) => v.visit_composite_lit(lit),
        Expr::FuncLit(lit) => v.visit_func_lit(lit),
        Expr::Paren(paren) => v.visit_expr(&paren.expr),
        Expr::Selector(selector) => v.visit_expr(&selector.expr),
        Expr::Index(index) => {
            v.visit_expr(&index.expr);
            for expr in &index.indices {
                v.visit_expr(expr);
            }
        }
        Expr::Slice(slice) => {
            v.visit_expr(&slice.expr);
            for expr in [&slice.low, &slice.high, &slice.max].into_iter().flatten() {
                v.visit_expr(expr);
            }
        }
        Expr::TypeAssert(assert) => {
            v.visit_expr(&assert.expr);
            if let Some(ty) = &assert.ty {
                v.visit_expr(ty);
            }
        }
        Expr::Call(call) => {
            v.visit_expr(&call.func);
            for arg in &call.args {
                v.visit_expr(arg);
            }
        }
        Expr::Star(star) => v.visit_expr(&star.expr),
        Expr::Unary(unary) => v.visit_expr(&unary.expr),
        Expr::Binary(binary) => {
            v.visit_expr(&binary.lhs);
            v.visit_expr(&binary.rhs);
        }
        Expr::KeyValue(kv) => {
            v.visit_expr(&kv.key);
            v.visit_expr(&kv.value);
        }
        Expr::Ellipsis(ellipsis) => {
            if let Some(elem) = &ellipsis.elem {
                v.visit_expr(elem);
            }
        }
        Expr::ArrayType(array) => {
            if let Some(len) = &array.len {
                v.visit_expr(len);
            }
            v.visit_expr(&array.elem);
        }
        Expr::StructType(st) => {
            for field in &st.fields {
                v.visit_field(field);
            }
        }
        Expr::FuncType(ty) => v.visit_func_type(ty),
        Expr::InterfaceType(iface) => {
            for field in &iface.methods {
                v.visit_field(field);
            }
            for embed in &iface.embeds {
                v.visit_expr(embed);
            }
        }
        Expr::MapType(map) => {
            v.visit_expr(&map.key);
            v.visit_expr(&map.value);
        }
        Expr::ChanType(chan) => v.visit_expr(&chan.elem),
    }
}

pub fn walk_composite_lit<V: Visit>(v: &mut V, lit: &CompositeLit) {
    if let Some(ty) = &lit.ty {
        v.visit_expr(ty);
    }
    for elt in &lit.elts {
        v.visit_expr(elt);
    }
}

pub fn walk_func_lit<V: Visit>(v: &mut V, lit: &FuncLit) {
    v.visit_func_type(&lit.sig);
    v.visit_block(&lit.body);
}

pub fn walk_func_type<V: Visit>(v: &mut V, ty: &FuncType) {
    for field in ty.params.iter().chain(&ty.results) {
        v.visit_field(field);
    }
}
