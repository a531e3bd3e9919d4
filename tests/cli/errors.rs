use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, POINT_GO, stderr, stdout};

#[test]
fn test_syntax_error_exits_with_one() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package a\nvar x int y\n")?;

    let output = test.run(&["bad.go"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(
        stderr(&output).starts_with("bad.go:2:11: expected ';', found y\n"),
        "unexpected stderr:\n{}",
        stderr(&output)
    );
    Ok(())
}

#[test]
fn test_errors_from_every_file_are_listed() -> Result<()> {
    let test = CliTest::with_file("a.go", "package a\nvar s = \"open\n")?;
    test.write_file("b.go", "package a\nfunc f(a int, string) {}\n")?;

    let output = test.run(&["a.go"])?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    let lines: Vec<_> = stderr.lines().collect();
    assert_eq!(lines[0], "a.go:2:9: string literal not terminated");
    assert!(lines.contains(&"./b.go:2:15: mixed named and unnamed parameters"));
    Ok(())
}

#[test]
fn test_verbose_syntax_error_shows_source() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package a\nvar x = T{1\n}\n")?;

    let output = test.run(&["-v", "bad.go"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "bad.go:2:12: missing ',' before newline in composite literal
  |
2 | var x = T{1
  |            ^
"
    );
    Ok(())
}

#[test]
fn test_non_go_file_is_rejected() -> Result<()> {
    let test = CliTest::with_file("notes.txt", "Point{1, 2}")?;

    let output = test.run(&["notes.txt"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "notes.txt: not a Go file within a package\n");
    Ok(())
}

#[test]
fn test_missing_file() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["gone.go"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("gone.go: "));
    Ok(())
}

#[test]
fn test_error_stops_later_inputs() -> Result<()> {
    let test = CliTest::with_file("bad/bad.go", "package bad\nvar = 1\n")?;
    test.write_file("good/point.go", POINT_GO)?;

    let output = test.run(&["-w", "bad/bad.go", "good/point.go"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("good/point.go")?, POINT_GO);
    Ok(())
}
