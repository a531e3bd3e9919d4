use pretty_assertions::assert_eq;

use crate::core::{
    ast::{
        CompositeLit, Decl, Expr, File, NodeIds, Spec, Stmt,
        visit::{Visit, walk_composite_lit},
    },
    source::SourceFile,
};

use super::parse_file;

fn parse(text: &str) -> File {
    let source = SourceFile::new("t.go", text);
    parse_file(&source, &mut NodeIds::default()).unwrap()
}

fn parse_err(text: &str) -> String {
    let source = SourceFile::new("t.go", text);
    parse_file(&source, &mut NodeIds::default())
        .unwrap_err()
        .to_string()
}

/// Source text of every composite literal, in visiting order.
fn literals(text: &str) -> Vec<String> {
    struct Collect<'a> {
        text: &'a str,
        found: Vec<String>,
    }

    impl Visit for Collect<'_> {
        fn visit_composite_lit(&mut self, lit: &CompositeLit) {
            self.found
                .push(self.text[lit.span.lo..lit.span.hi].to_string());
            walk_composite_lit(self, lit);
        }
    }

    let file = parse(text);
    let mut collect = Collect {
        text,
        found: Vec::new(),
    };
    collect.visit_file(&file);
    collect.found
}

fn func_body(file: &File, name: &str) -> Vec<Stmt> {
    file.decls
        .iter()
        .find_map(|decl| match decl {
            Decl::Func(func) if func.name.name == name => func.body.clone(),
            _ => None,
        })
        .map(|body| body.stmts)
        .unwrap()
}

#[test]
fn test_package_and_imports() {
    let file = parse(
        "package demo\n\nimport (\n\t\"fmt\"\n\tm \"example.com/mod/models\"\n\t. \"strings\"\n)\n",
    );
    assert_eq!(file.package.name, "demo");
    let imports: Vec<_> = file
        .imports()
        .map(|spec| {
            (
                spec.name.as_ref().map(|name| name.name.clone()),
                spec.path_value().to_string(),
            )
        })
        .collect();
    assert_eq!(
        imports,
        vec![
            (None, "fmt".to_string()),
            (Some("m".to_string()), "example.com/mod/models".to_string()),
            (Some(".".to_string()), "strings".to_string()),
        ]
    );
}

#[test]
fn test_literals_in_control_clauses() {
    let found = literals(
        "package a

func f() {
	if x == (T{1}) {
	}
	for _, v := range []T{{1, 2}} {
		_ = v
	}
	switch p := (P{1}); p.X {
	}
}
",
    );
    assert_eq!(found, vec!["T{1}", "[]T{{1, 2}}", "{1, 2}", "P{1}"]);
}

#[test]
fn test_type_name_before_block_is_not_a_literal() {
    let file = parse("package a\n\nfunc f() {\n\tfor x {\n\t}\n\tif ok {\n\t}\n}\n");
    let body = func_body(&file, "f");
    assert!(matches!(&body[0], Stmt::For(f) if matches!(f.cond, Some(Expr::Ident(_)))));
    assert!(matches!(&body[1], Stmt::If(_)));
}

#[test]
fn test_func_literal_body_resets_control_clause_level() {
    let found = literals(
        "package a\n\nfunc f() {\n\tif g := func() T { return T{1} }; g().X > 0 {\n\t}\n}\n",
    );
    assert_eq!(found, vec!["T{1}"]);
}

#[test]
fn test_generic_declarations() {
    let file = parse(
        "package a

type Pair[K comparable, V any] struct {
	Key K
	Val V
}

type Arr [N]int

func Map[T, U any](xs []T, f func(T) U) []U { return nil }

func (p *Pair[K, V]) Swap() {}

var p = Pair[string, int]{\"a\", 1}
",
    );

    let Decl::Gen(pair) = &file.decls[0] else {
        panic!("expected type declaration");
    };
    let Spec::Type(pair) = &pair.specs[0] else {
        panic!("expected type spec");
    };
    assert_eq!(pair.type_params.len(), 2);
    assert!(matches!(pair.ty, Expr::StructType(_)));

    let Decl::Gen(arr) = &file.decls[1] else {
        panic!("expected type declaration");
    };
    let Spec::Type(arr) = &arr.specs[0] else {
        panic!("expected type spec");
    };
    assert!(arr.type_params.is_empty());
    assert!(matches!(arr.ty, Expr::ArrayType(_)));

    let Decl::Func(map) = &file.decls[2] else {
        panic!("expected function");
    };
    let names: Vec<_> = map.type_params[0]
        .names
        .iter()
        .map(|name| name.name.as_str())
        .collect();
    assert_eq!(names, vec!["T", "U"]);
    assert_eq!(map.sig.params.len(), 2);
    assert_eq!(map.sig.results.len(), 1);

    let Decl::Func(swap) = &file.decls[3] else {
        panic!("expected method");
    };
    let recv = swap.recv.as_ref().unwrap();
    assert!(matches!(&recv[0].ty, Expr::Star(star) if matches!(star.expr, Expr::Index(_))));

    let Decl::Gen(var) = &file.decls[4] else {
        panic!("expected var declaration");
    };
    let Spec::Value(var) = &var.specs[0] else {
        panic!("expected value spec");
    };
    let Expr::CompositeLit(lit) = &var.values[0] else {
        panic!("expected composite literal");
    };
    assert!(matches!(lit.ty, Some(Expr::Index(_))));
    assert_eq!(lit.elts.len(), 2);
}

#[test]
fn test_struct_fields_and_embedding() {
    let file = parse(
        "package a

type S struct {
	*Base
	pkg.Other
	Gen[int]
	arr [4]byte
	A, B int `json:\"a\"`
}
",
    );
    let Decl::Gen(decl) = &file.decls[0] else {
        panic!("expected type declaration");
    };
    let Spec::Type(spec) = &decl.specs[0] else {
        panic!("expected type spec");
    };
    let Expr::StructType(st) = &spec.ty else {
        panic!("expected struct type");
    };
    let counts: Vec<_> = st.fields.iter().map(|field| field.names.len()).collect();
    assert_eq!(counts, vec![0, 0, 0, 1, 2]);
    assert!(st.fields[4].tag.is_some());
}

#[test]
fn test_switches_select_and_labels() {
    let file = parse(
        "package a

func f(v any, ch chan int) {
	switch x := v.(type) {
	case nil, *T:
		_ = x
	default:
	}
	select {
	case n := <-ch:
		_ = n
	case ch <- 1:
	default:
	}
L:
	for {
		break L
	}
}
",
    );
    let body = func_body(&file, "f");
    let Stmt::TypeSwitch(switch) = &body[0] else {
        panic!("expected type switch");
    };
    assert_eq!(switch.binding.as_ref().unwrap().name, "x");
    assert_eq!(switch.clauses.len(), 2);
    assert!(switch.clauses[1].is_default);

    let Stmt::Select(select) = &body[1] else {
        panic!("expected select");
    };
    assert_eq!(select.clauses.len(), 3);
    assert!(matches!(select.clauses[1].comm, Some(Stmt::Send(_))));

    let Stmt::Labeled(labeled) = &body[2] else {
        panic!("expected labeled statement");
    };
    assert_eq!(labeled.label.name, "L");
    assert!(matches!(labeled.stmt, Stmt::For(_)));
}

#[test]
fn test_slices_and_calls() {
    let found = literals(
        "package a\n\nfunc f(s []int) {\n\t_ = s[1:2]\n\t_ = s[:2:3]\n\tg(s...)\n\t_ = make([]T, 0)\n\t_ = []T{}\n}\n",
    );
    assert_eq!(found, vec!["[]T{}"]);
}

#[test]
fn test_literal_ids_are_unique_across_files() {
    let mut ids = NodeIds::default();
    let first = SourceFile::new("a.go", "package a\n\nvar x = T{1}\n");
    let second = SourceFile::new("b.go", "package a\n\nvar y = T{2}\n");
    let id = |file: &File| match &file.decls[0] {
        Decl::Gen(decl) => match &decl.specs[0] {
            Spec::Value(value) => match &value.values[0] {
                Expr::CompositeLit(lit) => lit.id,
                _ => panic!("expected composite literal"),
            },
            _ => panic!("expected value spec"),
        },
        _ => panic!("expected var declaration"),
    };
    let a = parse_file(&first, &mut ids).unwrap();
    let b = parse_file(&second, &mut ids).unwrap();
    assert_ne!(id(&a), id(&b));
}

#[test]
fn test_missing_comma_before_newline() {
    assert_eq!(
        parse_err("package a\nvar x = T{1\n}\n"),
        "t.go:2:12: missing ',' before newline in composite literal"
    );
}

#[test]
fn test_unexpected_token() {
    assert_eq!(
        parse_err("package a\nvar x int y\n"),
        "t.go:2:11: expected ';', found y"
    );
}

#[test]
fn test_missing_package_clause() {
    assert_eq!(
        parse_err("var x int\n"),
        "t.go:1:1: expected 'package', found 'var'"
    );
}

#[test]
fn test_mixed_parameters() {
    assert_eq!(
        parse_err("package a\nfunc f(a int, string) {}\n"),
        "t.go:2:15: mixed named and unnamed parameters"
    );
}

#[test]
fn test_lexer_errors_are_reported() {
    assert_eq!(
        parse_err("package a\nvar s = \"open\n"),
        "t.go:2:9: string literal not terminated"
    );
}
