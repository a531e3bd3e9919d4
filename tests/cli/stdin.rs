use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, POINT_GO, POINT_GO_KEYED, stderr, stdout};

#[test]
fn test_stdin_to_stdout() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run_with_stdin(&[], POINT_GO)?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), POINT_GO_KEYED);
    Ok(())
}

#[test]
fn test_stdin_sees_sibling_files() -> Result<()> {
    let test = CliTest::with_file("point.go", POINT_GO)?;

    let output = test.run_with_stdin(&[], "package shapes\n\nvar One = Point{1, 1}\n")?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "package shapes\n\nvar One = Point{X: 1, Y: 1}\n"
    );
    Ok(())
}

#[test]
fn test_stdin_list() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run_with_stdin(&["-l"], POINT_GO)?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "<standard input>\n");
    Ok(())
}

#[test]
fn test_stdin_list_unchanged() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run_with_stdin(&["-l"], POINT_GO_KEYED)?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    Ok(())
}

#[test]
fn test_write_on_stdin_is_rejected() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["-w"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "can't use -w on stdin\n");
    Ok(())
}
