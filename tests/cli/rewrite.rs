use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, POINT_GO, POINT_GO_KEYED, stderr, stdout};

#[test]
fn test_prints_rewritten_file() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;

    let output = test.run(&["point.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), POINT_GO_KEYED);
    assert_eq!(stderr(&output), "");
    assert_eq!(test.read_file("point.go")?, POINT_GO);
    Ok(())
}

#[test]
fn test_unchanged_file_is_printed_as_is() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO_KEYED)?;

    let output = test.run(&["point.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), POINT_GO_KEYED);
    Ok(())
}

#[test]
fn test_list_prints_changed_paths_only() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;
    test.write_file("line.go", "package shapes\n\ntype Line struct{ A, B Point }\n")?;

    let output = test.run(&["-l", "point.go", "line.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "point.go\n");
    assert_eq!(test.read_file("point.go")?, POINT_GO);
    Ok(())
}

#[test]
fn test_write_rewrites_in_place() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;

    let output = test.run(&["-w", "point.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(test.read_file("point.go")?, POINT_GO_KEYED);
    Ok(())
}

#[test]
fn test_list_and_write() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;
    test.write_file(
        "line.go",
        "package shapes\n\ntype Line struct{ A, B Point }\n\nvar Unit = Line{Origin, Point{1, 1}}\n",
    )?;

    let output = test.run(&["-l", "-w", "point.go", "line.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "point.go\nline.go\n");
    assert_eq!(test.read_file("point.go")?, POINT_GO_KEYED);
    assert_eq!(
        test.read_file("line.go")?,
        "package shapes\n\ntype Line struct{ A, B Point }\n\nvar Unit = Line{A: Origin, B: Point{X: 1, Y: 1}}\n"
    );
    Ok(())
}

#[test]
fn test_directory_argument() -> Result<()> {
    let test = CliTest::with_file("shapes/point.go", POINT_GO)?;
    test.write_file("shapes/testdata/skip.go", POINT_GO)?;
    test.write_file("shapes/.hidden/skip.go", POINT_GO)?;
    test.write_file("notes.txt", "Point{1, 2}")?;

    let output = test.run(&["-l", "-w", "."])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "./shapes/point.go\n");
    assert_eq!(test.read_file("shapes/point.go")?, POINT_GO_KEYED);
    assert_eq!(test.read_file("shapes/testdata/skip.go")?, POINT_GO);
    Ok(())
}

#[test]
fn test_types_from_module_imports() -> Result<()> {
    let test = CliTest::with_file("go.mod", "module example.com/maps\n\ngo 1.22\n")?;
    test.write_file("shapes/point.go", POINT_GO)?;
    test.write_file(
        "cmd/main.go",
        "package main

import (
    \"fmt\"

    \"example.com/maps/shapes\"
)

func main() {
    p := shapes.Point{3, 4}
    fmt.Println(p, fmt.Stringer(nil))
}
",
    )?;

    let output = test.run(&["cmd/main.go"])?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("p := shapes.Point{X: 3, Y: 4}"));
    Ok(())
}

#[test]
fn test_verbose_explains_skipped_literals() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;
    test.write_file("use.go", "package shapes\n\nvar Bad = Point{1}\nvar Lost = Missing{1}\n")?;

    let output = test.run(&["-v", "-l", "use.go"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "checking use.go (package shapes, 2 files)
note: literal left unchanged: 1 elements for 2 fields
  --> use.go:3:11
note: literal left unchanged: type could not be resolved
  --> use.go:4:12
"
    );
    Ok(())
}

#[test]
fn test_types_from_the_standard_library() -> Result<()> {
    let test = CliTest::with_file(
        "goroot/src/image/geom.go",
        "package image\n\ntype Point struct {\n    X, Y int\n}\n",
    )?;
    test.write_file(
        "app/main.go",
        "package main\n\nimport \"image\"\n\nvar p = image.Point{1, 2}\n",
    )?;

    let output = test
        .command()
        .env("GOROOT", test.path("goroot"))
        .args(["app/main.go"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "package main\n\nimport \"image\"\n\nvar p = image.Point{X: 1, Y: 2}\n"
    );
    Ok(())
}

#[test]
fn test_directory_with_several_files() -> Result<()> {
    let test = CliTest::with_file("shapes/point.go", POINT_GO)?;
    test.write_file(
        "shapes/line.go",
        "package shapes\n\ntype Line struct{ A, B Point }\n\nvar L = Line{Origin, Point{1, 1}}\n",
    )?;
    test.write_file("shapes/keyed.go", "package shapes\n\nvar K = Point{X: 2, Y: 2}\n")?;

    let output = test.run(&["-l", "shapes"])?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "shapes/line.go\nshapes/point.go\n");
    Ok(())
}
