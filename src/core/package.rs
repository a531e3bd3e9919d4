//! Compilation unit discovery.
//!
//! A unit is the set of `.go` files in one directory that share a package
//! clause. Files are parsed eagerly; any syntax error in the directory fails
//! the whole unit, with errors from every file collected together.

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::core::{
    ast::{File, NodeIds},
    errors::{KeyfixError, Result, SyntaxErrors},
    parsers::parse_file,
    source::{STDIN_NAME, SourceFile},
};

/// One parsed Go file with the text it was parsed from.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path on disk; `None` for the stdin stream.
    pub path: Option<PathBuf>,
    pub source: SourceFile,
    pub ast: File,
}

impl ParsedFile {
    pub fn package(&self) -> &str {
        &self.ast.package.name
    }
}

/// The files of one package, with the files being rewritten marked.
#[derive(Debug)]
pub struct Unit {
    pub package: String,
    pub dir: PathBuf,
    pub files: Vec<ParsedFile>,
    targets: Vec<usize>,
}

impl Unit {
    /// Indices into [`Unit::files`] of the files whose literals get keyed,
    /// in the order they were named.
    pub fn target_indices(&self) -> &[usize] {
        &self.targets
    }

    pub fn targets(&self) -> impl Iterator<Item = &ParsedFile> {
        self.targets.iter().map(|&index| &self.files[index])
    }
}

/// Load the unit containing the Go file at `path`.
pub fn load_file_unit(path: &Path) -> Result<Unit> {
    load_file_units(&[path.to_path_buf()])?
        .pop()
        .ok_or_else(|| KeyfixError::NotInPackage(path.to_path_buf()))
}

/// Load the units containing `paths`, which all live in one directory.
///
/// The directory is read and parsed once. Targets that share a package
/// clause end up in the same unit; units come in the order of their first
/// target.
pub fn load_file_units(paths: &[PathBuf]) -> Result<Vec<Unit>> {
    let Some(first) = paths.first() else {
        return Ok(Vec::new());
    };
    for path in paths {
        if !is_go_file(path) {
            return Err(KeyfixError::NotInPackage(path.clone()));
        }
        fs::metadata(path).map_err(|err| KeyfixError::io(path, err))?;
    }

    let dir = parent_dir(first);
    let mut ids = NodeIds::default();
    let mut files = Vec::new();
    let mut errors = SyntaxErrors::default();
    let mut targets = vec![None; paths.len()];

    for file_path in go_files_in(&dir)? {
        let target = paths
            .iter()
            .position(|path| path.file_name() == file_path.file_name());
        let display = match target {
            Some(index) => paths[index].clone(),
            None => file_path.clone(),
        };
        let text = fs::read_to_string(&file_path).map_err(|err| KeyfixError::io(&display, err))?;
        let source = SourceFile::new(display.to_string_lossy(), text);
        match parse_file(&source, &mut ids) {
            Ok(ast) => {
                if let Some(index) = target {
                    targets[index] = Some(files.len());
                }
                files.push(ParsedFile {
                    path: Some(display),
                    source,
                    ast,
                });
            }
            Err(errs) => errors.extend(errs),
        }
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }
    let targets = paths
        .iter()
        .zip(targets)
        .map(|(path, target)| target.ok_or_else(|| KeyfixError::NotInPackage(path.clone())))
        .collect::<Result<Vec<_>>>()?;

    Ok(partition(dir, files, &targets))
}

/// Load a unit for source text read from stdin.
///
/// Sibling files in `cwd` with the same package clause join the unit. The
/// stream goes last so its declarations shadow the siblings' ones.
pub fn load_stdin_unit(text: String, cwd: &Path) -> Result<Unit> {
    let mut ids = NodeIds::default();
    let source = SourceFile::new(STDIN_NAME, text);
    let ast = parse_file(&source, &mut ids)?;
    let stdin = ParsedFile {
        path: None,
        source,
        ast,
    };

    let mut files = Vec::new();
    let mut errors = SyntaxErrors::default();
    for file_path in go_files_in(cwd)? {
        let text =
            fs::read_to_string(&file_path).map_err(|err| KeyfixError::io(&file_path, err))?;
        let source = SourceFile::new(file_path.to_string_lossy(), text);
        match parse_file(&source, &mut ids) {
            Ok(ast) => files.push(ParsedFile {
                path: Some(file_path),
                source,
                ast,
            }),
            Err(errs) => errors.extend(errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let target = files.len();
    files.push(stdin);
    partition(cwd.to_path_buf(), files, &[target])
        .pop()
        .ok_or_else(|| KeyfixError::NotInPackage(PathBuf::from(STDIN_NAME)))
}

/// Split `files` into one unit per package of a target. Files of packages
/// without a target are dropped.
fn partition(dir: PathBuf, files: Vec<ParsedFile>, targets: &[usize]) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    for &target in targets {
        let package = files[target].package();
        if !units.iter().any(|unit| unit.package == package) {
            units.push(Unit {
                package: package.to_string(),
                dir: dir.clone(),
                files: Vec::new(),
                targets: Vec::new(),
            });
        }
    }

    let mut moved = vec![None; files.len()];
    for (index, file) in files.into_iter().enumerate() {
        let Some(unit) = units.iter().position(|unit| unit.package == file.package()) else {
            continue;
        };
        moved[index] = Some((unit, units[unit].files.len()));
        units[unit].files.push(file);
    }
    for &target in targets {
        if let Some((unit, index)) = moved[target] {
            units[unit].targets.push(index);
        }
    }
    units
}

/// `.go` files directly inside `dir`, sorted by path.
pub fn go_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| KeyfixError::io(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| KeyfixError::io(dir, err))?;
        let path = entry.path();
        if path.is_file() && is_go_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Every `.go` file below `dir`, skipping hidden entries and `testdata`.
///
/// Within a directory, files come before subdirectories, so the files of
/// one directory are adjacent.
pub fn go_files_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by(|a, b| {
            let a_dir = a.file_type().is_dir();
            let b_dir = b.file_type().is_dir();
            a_dir.cmp(&b_dir).then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            KeyfixError::io(path, err.into())
        })?;
        if entry.file_type().is_file() && is_go_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || name == "testdata"
}

pub fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
