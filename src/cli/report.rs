//! Diagnostics on stderr.
//!
//! Errors are printed plainly, one per line, so the output stays easy to
//! parse. Everything else here is verbose-only.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{
    errors::{KeyfixError, SyntaxError},
    keying::Skipped,
    package::Unit,
};

/// Print a fatal error. In verbose mode syntax errors get a source excerpt.
pub fn print_error(err: &anyhow::Error, verbose: bool) {
    print_error_to(err, verbose, &mut io::stderr().lock());
}

pub fn print_error_to<W: Write>(err: &anyhow::Error, verbose: bool, writer: &mut W) {
    match err.downcast_ref::<KeyfixError>() {
        Some(KeyfixError::Syntax(errors)) => {
            for error in errors.iter() {
                let _ = writeln!(writer, "{}", error);
                if verbose {
                    print_excerpt(error, writer);
                }
            }
        }
        Some(err) => {
            let _ = writeln!(writer, "{}", err);
        }
        None => {
            let _ = writeln!(writer, "{:#}", err);
        }
    }
}

/// Source line with a caret under the error column.
fn print_excerpt<W: Write>(error: &SyntaxError, writer: &mut W) {
    let line = error.position.line.to_string();
    let width = line.len();
    let source_line = error.source_line.as_str();

    // Columns count bytes; the caret is placed by display width.
    let prefix = source_line
        .get(..error.position.column.saturating_sub(1))
        .unwrap_or(source_line);
    let padding = UnicodeWidthStr::width(prefix);

    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = width);
    let _ = writeln!(
        writer,
        "{} {} {}",
        line.blue(),
        "|".blue(),
        source_line,
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".red(),
        width = width,
        padding = padding
    );
}

/// Which files make up the unit being rewritten.
pub fn print_unit(unit: &Unit) {
    print_unit_to(unit, &mut io::stderr().lock());
}

pub fn print_unit_to<W: Write>(unit: &Unit, writer: &mut W) {
    let targets: Vec<_> = unit.targets().map(|file| file.source.name()).collect();
    let _ = writeln!(
        writer,
        "{} {} (package {}, {} {})",
        "checking".bold().green(),
        targets.join(", "),
        unit.package,
        unit.files.len(),
        if unit.files.len() == 1 { "file" } else { "files" }
    );
}

pub fn print_warnings(warnings: &[String]) {
    print_warnings_to(warnings, &mut io::stderr().lock());
}

pub fn print_warnings_to<W: Write>(warnings: &[String], writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), warning);
    }
}

/// Literals left unchanged for a reason other than being keyed already or
/// not being struct literals.
pub fn print_skipped(name: &str, skipped: &[Skipped]) {
    print_skipped_to(name, skipped, &mut io::stderr().lock());
}

pub fn print_skipped_to<W: Write>(name: &str, skipped: &[Skipped], writer: &mut W) {
    for skip in skipped.iter().filter(|skip| skip.reason.is_notable()) {
        let _ = writeln!(
            writer,
            "{} literal left unchanged: {}",
            "note:".bold().cyan(),
            skip.reason
        );
        let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), name, skip.position);
    }
}

pub fn print_rewritten(name: &str, keyed: usize) {
    print_rewritten_to(name, keyed, &mut io::stderr().lock());
}

pub fn print_rewritten_to<W: Write>(name: &str, keyed: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} ({} {})",
        "rewrote".bold().green(),
        name,
        keyed,
        if keyed == 1 { "literal" } else { "literals" }
    );
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::core::{
        errors::SyntaxErrors,
        keying::SkipReason,
        package::load_file_units,
        source::{Position, SourceFile},
    };

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    fn syntax_error() -> anyhow::Error {
        let source = SourceFile::new("t.go", "package p\nvar s = \"日本\" +\n");
        let mut errors = SyntaxErrors::default();
        errors.push(SyntaxError::at(&source, 25, "expected operand"));
        errors.push(SyntaxError::at(&source, 10, "second"));
        KeyfixError::Syntax(errors).into()
    }

    #[test]
    fn test_syntax_errors_one_per_line() {
        let out = render(|out| print_error_to(&syntax_error(), false, out));

        assert_snapshot!(out, @r"
        t.go:2:16: expected operand
        t.go:2:1: second
        ");
    }

    #[test]
    fn test_verbose_excerpt_aligns_caret_by_width() {
        let out = render(|out| print_error_to(&syntax_error(), true, out));

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "t.go:2:16: expected operand");
        assert_eq!(lines[2], "2 | var s = \"日本\" +");
        assert_eq!(lines[3], format!("  | {}^", " ".repeat(13)));
    }

    #[test]
    fn test_other_errors_print_their_message() {
        let err: anyhow::Error = KeyfixError::Usage("can't use -w on stdin".to_string()).into();

        let out = render(|out| print_error_to(&err, true, out));

        assert_eq!(out, "can't use -w on stdin\n");
    }

    #[test]
    fn test_unit_lists_every_target() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.go");
        let b = dir.path().join("b.go");
        std::fs::write(&a, "package p\n").unwrap();
        std::fs::write(&b, "package p\n").unwrap();
        std::fs::write(dir.path().join("c.go"), "package p\n").unwrap();
        let units = load_file_units(&[a.clone(), b.clone()]).unwrap();

        let out = render(|out| print_unit_to(&units[0], out));

        assert_eq!(
            out,
            format!(
                "checking {}, {} (package p, 3 files)\n",
                a.display(),
                b.display()
            )
        );
    }

    #[test]
    fn test_only_notable_skips_are_printed() {
        let skipped = vec![
            Skipped {
                position: Position { line: 3, column: 9 },
                reason: SkipReason::AlreadyKeyed,
            },
            Skipped {
                position: Position { line: 5, column: 2 },
                reason: SkipReason::ArityMismatch {
                    elements: 1,
                    fields: 2,
                },
            },
        ];

        let out = render(|out| print_skipped_to("t.go", &skipped, out));

        assert_snapshot!(out, @r"
        note: literal left unchanged: 1 elements for 2 fields
          --> t.go:5:2
        ");
    }
}
