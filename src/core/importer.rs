//! Loading of imported packages.
//!
//! Packages under the module path declared in the nearest `go.mod` are
//! loaded from the module, and standard library packages from `GOROOT`.
//! Imports of module packages are followed transitively; imports of standard
//! library packages are not. Anything else stays unresolved, and qualified
//! types from it are simply unknown to the resolver.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::core::{
    ast::NodeIds,
    build::BuildContext,
    package::{ParsedFile, go_files_in},
    parsers::parse_file,
    source::SourceFile,
};

/// The module that owns a package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module path from the `module` directive.
    pub path: String,
    /// Directory holding `go.mod`.
    pub root: PathBuf,
}

impl Module {
    /// Nearest module enclosing `dir`.
    pub fn find(dir: &Path) -> Option<Module> {
        let dir = dir.canonicalize().ok()?;
        dir.ancestors().find_map(|candidate| {
            let text = fs::read_to_string(candidate.join("go.mod")).ok()?;
            Some(Module {
                path: module_directive(&text)?,
                root: candidate.to_path_buf(),
            })
        })
    }

    /// Directory for an import path, if it belongs to this module.
    pub fn dir_for(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rest = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(join_import_path(&self.root, rest))
    }
}

/// Module path declared by a `go.mod` file.
fn module_directive(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with([' ', '\t', '"']) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Root of a Go installation, whose `src` holds the standard library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goroot {
    pub root: PathBuf,
}

impl Goroot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$GOROOT` if set, otherwise what `go env GOROOT` reports.
    pub fn locate() -> Option<Goroot> {
        if let Some(root) = env::var_os("GOROOT").filter(|root| !root.is_empty()) {
            return Some(Goroot::new(root));
        }
        let output = Command::new("go").args(["env", "GOROOT"]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8(output.stdout).ok()?;
        let root = root.trim();
        (!root.is_empty()).then(|| Goroot::new(root))
    }

    /// Directory for a standard library import path. Those have no dot in
    /// their first element; `C` is cgo's pseudo-package.
    pub fn dir_for(&self, import_path: &str) -> Option<PathBuf> {
        let first = import_path.split('/').next().unwrap_or_default();
        if first.is_empty() || first.contains('.') || import_path == "C" {
            return None;
        }
        Some(join_import_path(&self.root.join("src"), import_path))
    }
}

fn join_import_path(root: &Path, import_path: &str) -> PathBuf {
    import_path
        .split('/')
        .fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// A loaded package.
#[derive(Debug)]
pub struct ImportedPackage {
    /// Name from the package clause.
    pub name: String,
    pub files: Vec<ParsedFile>,
}

/// Every package reachable from a unit's imports.
#[derive(Debug, Default)]
pub struct Imports {
    pub packages: Vec<ImportedPackage>,
    by_path: HashMap<String, usize>,
    /// Problems that left a package or file unloaded; reported in verbose
    /// mode.
    pub warnings: Vec<String>,
}

impl Imports {
    /// Load the imports of `files`, which live in `dir`. Standard library
    /// packages are only found when `goroot` is known.
    pub fn load(dir: &Path, files: &[ParsedFile], goroot: Option<&Goroot>) -> Imports {
        let mut imports = Imports::default();
        let module = Module::find(dir);
        let build = BuildContext::host();

        let mut queue: VecDeque<String> = files
            .iter()
            .flat_map(|file| file.ast.imports().map(|spec| spec.path_value().to_string()))
            .collect();
        let mut seen = HashSet::new();
        let mut ids = NodeIds::default();

        while let Some(import_path) = queue.pop_front() {
            if !seen.insert(import_path.clone()) {
                continue;
            }
            let (pkg_dir, follow) = match module.as_ref().and_then(|m| m.dir_for(&import_path)) {
                Some(pkg_dir) => (pkg_dir, true),
                None => match goroot.and_then(|goroot| goroot.dir_for(&import_path)) {
                    Some(pkg_dir) => (pkg_dir, false),
                    None => continue,
                },
            };
            let Some(package) =
                load_package(&pkg_dir, &import_path, build, &mut ids, &mut imports.warnings)
            else {
                continue;
            };
            if follow {
                for file in &package.files {
                    queue.extend(file.ast.imports().map(|spec| spec.path_value().to_string()));
                }
            }
            imports
                .by_path
                .insert(import_path, imports.packages.len());
            imports.packages.push(package);
        }

        imports
    }

    /// Index into [`Imports::packages`] for an import path.
    pub fn index_of(&self, import_path: &str) -> Option<usize> {
        self.by_path.get(import_path).copied()
    }
}

fn load_package(
    dir: &Path,
    import_path: &str,
    build: BuildContext,
    ids: &mut NodeIds,
    warnings: &mut Vec<String>,
) -> Option<ImportedPackage> {
    let paths = match go_files_in(dir) {
        Ok(paths) => paths,
        Err(err) => {
            warnings.push(format!("cannot load {}: {}", import_path, err));
            return None;
        }
    };

    let mut files: Vec<ParsedFile> = Vec::new();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name.ends_with("_test.go") {
            continue;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(format!("cannot read {}: {}", path.display(), err));
                continue;
            }
        };
        if !build.includes(&file_name, &text) {
            continue;
        }
        let source = SourceFile::new(path.to_string_lossy(), text);
        match parse_file(&source, ids) {
            Ok(ast) => files.push(ParsedFile {
                path: Some(path),
                source,
                ast,
            }),
            Err(errors) => {
                for error in errors.iter() {
                    warnings.push(format!("skipping imported file: {}", error));
                }
            }
        }
    }

    let name = files.first()?.package().to_string();
    files.retain(|file| file.package() == name);
    Some(ImportedPackage { name, files })
}
