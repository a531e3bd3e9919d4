use std::fs;

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};

use crate::core::{
    ast::{
        CompositeLit,
        visit::{Visit, walk_composite_lit},
    },
    importer::Imports,
    package::{Unit, load_file_unit},
    types::{TypeInfo, resolve},
};

/// Write `files` into a fresh directory and load the unit of the first one.
fn load(files: &[(&str, &str)]) -> (TempDir, Unit) {
    let dir = tempdir().unwrap();
    for (name, text) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    let unit = load_file_unit(&dir.path().join(files[0].0)).unwrap();
    (dir, unit)
}

fn resolve_unit(unit: &Unit) -> TypeInfo {
    let imports = Imports::load(&unit.dir, &unit.files, None);
    resolve(unit, &imports)
}

/// Every literal of the target file with the display of its resolved type.
fn literal_types(files: &[(&str, &str)]) -> Vec<(String, Option<String>)> {
    struct Collect<'a> {
        text: &'a str,
        info: &'a TypeInfo,
        found: Vec<(String, Option<String>)>,
    }

    impl Visit for Collect<'_> {
        fn visit_composite_lit(&mut self, lit: &CompositeLit) {
            let ty = self
                .info
                .literal_type(lit.id)
                .map(|ty| self.info.table.display(ty));
            self.found
                .push((self.text[lit.span.lo..lit.span.hi].to_string(), ty));
            walk_composite_lit(self, lit);
        }
    }

    let (_dir, unit) = load(files);
    let info = resolve_unit(&unit);
    let target = unit.targets().next().unwrap();
    let mut collect = Collect {
        text: target.source.text(),
        info: &info,
        found: Vec::new(),
    };
    collect.visit_file(&target.ast);
    collect.found
}

fn lit(text: &str, ty: Option<&str>) -> (String, Option<String>) {
    (text.to_string(), ty.map(str::to_string))
}

#[test]
fn test_explicit_literal_types() {
    let found = literal_types(&[(
        "a.go",
        "package p

type T struct{ X, Y int }

var a = T{1, 2}
var b = []int{1}
var c = Unknown{}
var d = &T{3, 4}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("T{1, 2}", Some("T")),
            lit("[]int{1}", Some("[]int")),
            lit("Unknown{}", None),
            lit("T{3, 4}", Some("T")),
        ]
    );
}

#[test]
fn test_elided_element_types() {
    let found = literal_types(&[(
        "a.go",
        "package p

type T struct{ X, Y int }
type K struct{ ID int }

var a = []T{{1, 2}}
var b = []*T{{1, 2}}
var m = map[K]T{{1}: {2, 3}}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("[]T{{1, 2}}", Some("[]T")),
            lit("{1, 2}", Some("T")),
            lit("[]*T{{1, 2}}", Some("[]*T")),
            lit("{1, 2}", Some("*T")),
            lit("map[K]T{{1}: {2, 3}}", Some("map[K]T")),
            lit("{1}", Some("K")),
            lit("{2, 3}", Some("T")),
        ]
    );
}

#[test]
fn test_named_slice_element_type() {
    let found = literal_types(&[(
        "a.go",
        "package p

type Point struct{ X, Y int }
type Path []Point

var path = Path{{1, 2}, {3, 4}}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("Path{{1, 2}, {3, 4}}", Some("Path")),
            lit("{1, 2}", Some("Point")),
            lit("{3, 4}", Some("Point")),
        ]
    );
}

#[test]
fn test_aliases_local_types_and_shadowing() {
    let found = literal_types(&[(
        "a.go",
        "package p

type A = T
type T struct{ X int }

func f() {
	type L struct{ A, B int }
	_ = L{1, 2}
	_ = A{1}
}

func g(T int) {
	_ = T{1}
}

func h(v any) {
	switch T := v.(type) {
	case int:
		_ = T{1}
	}
	_ = T{2}
}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("L{1, 2}", Some("L")),
            lit("A{1}", Some("T")),
            lit("T{1}", None),
            lit("T{1}", None),
            lit("T{2}", Some("T")),
        ]
    );
}

#[test]
fn test_generic_types() {
    let found = literal_types(&[(
        "a.go",
        "package p

type Pair[K comparable, V any] struct {
	Key K
	Val V
}

var p = Pair[string, int]{\"a\", 1}

func build[T any]() {
	_ = T{}
}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("Pair[string, int]{\"a\", 1}", Some("Pair")),
            lit("T{}", Some("opaque type")),
        ]
    );
}

#[test]
fn test_type_arguments_reach_elided_elements() {
    let found = literal_types(&[(
        "a.go",
        "package p

type Point struct{ X, Y int }
type List[T any] []T
type Index[K comparable, V any] map[K]V
type Tree[T any] struct {
	Val         T
	Left, Right *Tree[T]
}

var l = List[Point]{{1, 2}}
var m = Index[string, *Point]{\"a\": {3, 4}}
var t = Tree[Point]{Point{5, 6}, nil, nil}
var u = List[int]{7}
",
    )]);
    assert_eq!(
        found,
        vec![
            lit("List[Point]{{1, 2}}", Some("List")),
            lit("{1, 2}", Some("Point")),
            lit("Index[string, *Point]{\"a\": {3, 4}}", Some("Index")),
            lit("{3, 4}", Some("*Point")),
            lit("Tree[Point]{Point{5, 6}, nil, nil}", Some("Tree")),
            lit("Point{5, 6}", Some("Point")),
            lit("List[int]{7}", Some("List")),
        ]
    );
}

#[test]
fn test_declarations_from_sibling_files() {
    let found = literal_types(&[
        ("a.go", "package p\n\nvar v = T{1}\n"),
        ("b.go", "package p\n\ntype T struct{ X int }\n"),
    ]);
    assert_eq!(found, vec![lit("T{1}", Some("T"))]);
}

#[test]
fn test_definition_cycle_is_unresolved() {
    let found = literal_types(&[(
        "a.go",
        "package p\n\ntype C1 C2\ntype C2 C1\ntype U Undeclared\n\nvar c = C1{}\nvar u = U{}\n",
    )]);
    assert_eq!(found, vec![lit("C1{}", None), lit("U{}", None)]);
}

#[test]
fn test_embedded_field_names() {
    let (_dir, unit) = load(&[(
        "a.go",
        "package p

type Base struct{}
type G[T any] struct{ V T }

type E struct {
	*Base
	io.Reader
	G[int]
	X int
}

var e = E{}
",
    )]);
    let info = resolve_unit(&unit);
    let ty = (0..)
        .map(crate::core::ast::NodeId)
        .find_map(|id| info.literal_type(id))
        .unwrap();

    assert_eq!(
        info.table.struct_fields(ty).unwrap(),
        ["Base", "Reader", "G", "X"]
    );
}

#[test]
fn test_in_module_imports() {
    let found = literal_types(&[
        (
            "app/main.go",
            "package main

import (
	\"fmt\"

	m \"example.com/shop/models\"
	. \"example.com/shop/geo\"
)

var item = m.Item{\"pen\", 3}
var at = Point{1, 2}
var hidden = m.secret{}
var s = fmt.Stringer{}
var alias = m.Spot{5, 6}
",
        ),
        ("go.mod", "module example.com/shop\n"),
        (
            "models/item.go",
            "package models

import \"example.com/shop/geo\"

type Item struct {
	Name  string
	Count int
}

type secret struct{ x int }

type Spot = geo.Point
",
        ),
        ("geo/point.go", "package geo\n\ntype Point struct{ X, Y int }\n"),
    ]);
    assert_eq!(
        found,
        vec![
            lit("m.Item{\"pen\", 3}", Some("models.Item")),
            lit("Point{1, 2}", Some("geo.Point")),
            lit("m.secret{}", None),
            lit("fmt.Stringer{}", None),
            lit("m.Spot{5, 6}", Some("geo.Point")),
        ]
    );
}
