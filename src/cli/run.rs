//! Per-input orchestration.
//!
//! Inputs are processed one at a time, in order. The files a directory
//! expands to are loaded one directory at a time, so each package is parsed
//! and resolved once. The first error stops the run; files rewritten before
//! it stay rewritten.

use std::{
    env, fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::report;
use crate::{
    config::{Input, Options},
    core::{
        errors::KeyfixError,
        fix::fix_unit,
        importer::Goroot,
        package::{Unit, go_files_under, load_file_units, load_stdin_unit},
        source::STDIN_NAME,
    },
};

pub fn run<W: Write>(options: Options, input: Input, out: &mut W) -> Result<()> {
    options.validate(&input)?;
    let goroot = Goroot::locate();

    match input {
        Input::Stdin => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| KeyfixError::io(STDIN_NAME, err))?;
            let cwd = env::current_dir().map_err(|err| KeyfixError::io(".", err))?;
            let unit = load_stdin_unit(text, &cwd)?;
            process(&unit, &options, goroot.as_ref(), out)
        }
        Input::Paths(paths) => {
            for path in paths {
                for group in by_directory(expand(&path)?) {
                    for unit in load_file_units(&group)? {
                        process(&unit, &options, goroot.as_ref(), out)?;
                    }
                }
            }
            Ok(())
        }
    }
}

/// A directory stands for every Go file below it.
fn expand(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        Ok(go_files_under(path)?)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Split `files` into runs of adjacent files from one directory.
fn by_directory(files: Vec<PathBuf>) -> Vec<Vec<PathBuf>> {
    let mut groups: Vec<Vec<PathBuf>> = Vec::new();
    for file in files {
        match groups.last_mut() {
            Some(group)
                if group
                    .last()
                    .is_some_and(|last| last.parent() == file.parent()) =>
            {
                group.push(file);
            }
            _ => groups.push(vec![file]),
        }
    }
    groups
}

fn process<W: Write>(
    unit: &Unit,
    options: &Options,
    goroot: Option<&Goroot>,
    out: &mut W,
) -> Result<()> {
    if options.verbose {
        report::print_unit(unit);
    }

    let outcome = fix_unit(unit, options.needs_text(), goroot);
    if options.verbose {
        report::print_warnings(&outcome.warnings);
    }

    for (target, fixed) in unit.targets().zip(outcome.files) {
        let name = target.source.name();
        if options.verbose {
            report::print_skipped(name, &fixed.skipped);
        }

        if fixed.changed && options.list_changed {
            writeln!(out, "{}", name).context("failed to write to stdout")?;
        }

        let Some(text) = fixed.output else {
            continue;
        };
        if options.overwrite {
            match &target.path {
                Some(path) if fixed.changed => {
                    fs::write(path, text).map_err(|err| KeyfixError::io(path, err))?;
                    if options.verbose {
                        report::print_rewritten(name, fixed.keyed);
                    }
                }
                _ => {}
            }
        } else if options.emit_text {
            out.write_all(text.as_bytes())
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}
