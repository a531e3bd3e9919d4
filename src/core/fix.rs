//! One rewrite of one compilation unit: import loading, type resolution and
//! keying of each of the unit's target files.

use crate::core::{
    importer::{Goroot, Imports},
    keying::{Skipped, key_file},
    package::Unit,
    types::resolve,
};

/// Result for one target file.
#[derive(Debug)]
pub struct FixOutcome {
    pub changed: bool,
    pub keyed: usize,
    /// The rewritten text, when it was requested.
    pub output: Option<String>,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug)]
pub struct UnitOutcome {
    /// One entry per target, in [`Unit::targets`] order.
    pub files: Vec<FixOutcome>,
    /// Imported packages or files that could not be loaded.
    pub warnings: Vec<String>,
}

/// Key the unkeyed struct literals of `unit`'s target files.
///
/// Imports and types are resolved once for the whole unit. With `emit_text`
/// off the edits are not materialized and `output` is `None`; `changed` is
/// computed either way.
pub fn fix_unit(unit: &Unit, emit_text: bool, goroot: Option<&Goroot>) -> UnitOutcome {
    let imports = Imports::load(&unit.dir, &unit.files, goroot);
    let info = resolve(unit, &imports);

    let files = unit
        .targets()
        .map(|target| {
            let result = key_file(target, &info, emit_text);
            FixOutcome {
                changed: result.changed,
                keyed: result.keyed,
                output: result
                    .script
                    .map(|script| script.apply(target.source.text())),
                skipped: result.skipped,
            }
        })
        .collect();

    UnitOutcome {
        files,
        warnings: imports.warnings,
    }
}
