use crate::core::{
    ast::{
        CompositeLit,
        visit::{Visit, walk_composite_lit},
    },
    package::ParsedFile,
    source::{Position, SourceFile},
    types::TypeInfo,
};

use super::{
    classify::{Eligibility, SkipReason, classify},
    patch::EditScript,
};

/// A literal left untouched, for verbose reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub position: Position,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct KeyingResult {
    /// Whether at least one literal qualified.
    pub changed: bool,
    /// Number of literals that qualified.
    pub keyed: usize,
    /// `None` when the edits were not requested.
    pub script: Option<EditScript>,
    pub skipped: Vec<Skipped>,
}

/// Walk `file` and key every eligible literal.
///
/// With `record_edits` off only the changed flag and the skip list are
/// computed, which is all list mode needs.
pub fn key_file(file: &ParsedFile, info: &TypeInfo, record_edits: bool) -> KeyingResult {
    let mut visitor = KeyingVisitor {
        source: &file.source,
        info,
        result: KeyingResult {
            script: record_edits.then(EditScript::new),
            ..KeyingResult::default()
        },
    };
    visitor.visit_file(&file.ast);
    visitor.result
}

struct KeyingVisitor<'a> {
    source: &'a SourceFile,
    info: &'a TypeInfo,
    result: KeyingResult,
}

impl Visit for KeyingVisitor<'_> {
    fn visit_composite_lit(&mut self, lit: &CompositeLit) {
        let ty = self.info.literal_type(lit.id);
        match classify(lit, ty, &self.info.table) {
            Eligibility::Eligible(fields) => {
                self.result.changed = true;
                self.result.keyed += 1;
                if let Some(script) = &mut self.result.script {
                    for (elt, field) in lit.elts.iter().zip(fields) {
                        script.insert(elt.span().lo, format!("{}: ", field));
                    }
                }
            }
            Eligibility::NotEligible(reason) => self.result.skipped.push(Skipped {
                position: self.source.position(lit.span.lo),
                reason,
            }),
        }
        walk_composite_lit(self, lit);
    }
}
