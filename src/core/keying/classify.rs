use std::fmt;

use crate::core::{
    ast::{CompositeLit, Expr},
    types::{TypeId, TypeTable},
};

/// Why a literal is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No static type was found for the literal.
    Unresolved,
    /// The literal's type is not a struct, even after unwrapping.
    NotStruct(String),
    EmptyStruct,
    ArityMismatch { elements: usize, fields: usize },
    /// The first element is a `key: value` pair.
    AlreadyKeyed,
    /// A `_` field cannot be named in a keyed literal.
    BlankField,
}

impl SkipReason {
    /// Reasons worth a note in verbose mode. Keyed literals and
    /// non-struct literals are the common case and stay silent.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            Self::Unresolved | Self::ArityMismatch { .. } | Self::BlankField
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "type could not be resolved"),
            Self::NotStruct(ty) => write!(f, "{} is not a struct type", ty),
            Self::EmptyStruct => write!(f, "struct type has no fields"),
            Self::ArityMismatch { elements, fields } => {
                write!(f, "{} elements for {} fields", elements, fields)
            }
            Self::AlreadyKeyed => write!(f, "literal is already keyed"),
            Self::BlankField => write!(f, "struct type has a blank (_) field"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility<'t> {
    /// Field names in declaration order, one per element.
    Eligible(Vec<&'t str>),
    NotEligible(SkipReason),
}

/// Decide whether `lit`, whose resolved type is `ty`, gets field names.
pub fn classify<'t>(
    lit: &CompositeLit,
    ty: Option<TypeId>,
    table: &'t TypeTable,
) -> Eligibility<'t> {
    let Some(ty) = ty else {
        return Eligibility::NotEligible(SkipReason::Unresolved);
    };
    let Some(fields) = table.struct_fields(ty) else {
        return Eligibility::NotEligible(SkipReason::NotStruct(table.display(ty)));
    };
    if fields.is_empty() {
        return Eligibility::NotEligible(SkipReason::EmptyStruct);
    }
    if lit.elts.len() != fields.len() {
        return Eligibility::NotEligible(SkipReason::ArityMismatch {
            elements: lit.elts.len(),
            fields: fields.len(),
        });
    }
    // Go rejects literals that mix keyed and positional elements.
    if matches!(lit.elts.first(), Some(Expr::KeyValue(_))) {
        return Eligibility::NotEligible(SkipReason::AlreadyKeyed);
    }
    if fields.iter().any(|field| field == "_") {
        return Eligibility::NotEligible(SkipReason::BlankField);
    }

    Eligibility::Eligible(fields.iter().map(String::as_str).collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::{
        ast::visit::{Visit, walk_composite_lit},
        importer::Imports,
        package::load_stdin_unit,
        types::{TypeInfo, resolve},
    };

    type Outcome = std::result::Result<Vec<String>, SkipReason>;

    /// Classification of every literal in `text`, in source order.
    fn classify_all(text: &str) -> Vec<Outcome> {
        struct Collect<'a> {
            info: &'a TypeInfo,
            found: Vec<Outcome>,
        }

        impl Visit for Collect<'_> {
            fn visit_composite_lit(&mut self, lit: &CompositeLit) {
                let ty = self.info.literal_type(lit.id);
                let outcome = match classify(lit, ty, &self.info.table) {
                    Eligibility::Eligible(names) => {
                        Ok(names.into_iter().map(str::to_string).collect())
                    }
                    Eligibility::NotEligible(reason) => Err(reason),
                };
                self.found.push(outcome);
                walk_composite_lit(self, lit);
            }
        }

        let dir = tempdir().unwrap();
        let unit = load_stdin_unit(text.to_string(), dir.path()).unwrap();
        let info = resolve(&unit, &Imports::default());
        let mut collect = Collect {
            info: &info,
            found: Vec::new(),
        };
        collect.visit_file(&unit.targets().next().unwrap().ast);
        collect.found
    }

    fn keyed(names: &[&str]) -> Outcome {
        Ok(names.iter().map(|name| name.to_string()).collect())
    }

    #[test]
    fn test_rules_in_order() {
        let found = classify_all(
            "package p

type T struct{ X, Y int }
type Three struct{ A, B, C int }
type Empty struct{}

var (
	a = T{1, 2}
	b = T{X: 1, Y: 2}
	c = Three{1, 2}
	d = []int{1, 2, 3}
	e = Empty{}
	f = Missing{1}
)
",
        );
        assert_eq!(
            found,
            vec![
                keyed(&["X", "Y"]),
                Err(SkipReason::AlreadyKeyed),
                Err(SkipReason::ArityMismatch {
                    elements: 2,
                    fields: 3,
                }),
                Err(SkipReason::NotStruct("[]int".to_string())),
                Err(SkipReason::EmptyStruct),
                Err(SkipReason::Unresolved),
            ]
        );
    }

    #[test]
    fn test_pointer_and_named_are_unwrapped() {
        let found = classify_all(
            "package p

type Base struct{ X, Y int }
type Point Base
type Points []*Point

var ps = Points{{1, 2}}
",
        );
        assert_eq!(
            found,
            vec![
                Err(SkipReason::NotStruct("Points".to_string())),
                keyed(&["X", "Y"]),
            ]
        );
    }

    #[test]
    fn test_embedded_fields_use_type_name() {
        let found = classify_all(
            "package p

type Base struct{ ID int }
type Wrapper struct {
	*Base
	Name string
}

var w = Wrapper{nil, \"x\"}
",
        );
        assert_eq!(found, vec![keyed(&["Base", "Name"])]);
    }

    #[test]
    fn test_blank_field_cannot_be_keyed() {
        let found = classify_all(
            "package p

type Padded struct {
	_ int
	Y int
}

var a = Padded{1, 2}
var b = Padded{1}
",
        );
        assert_eq!(
            found,
            vec![
                Err(SkipReason::BlankField),
                Err(SkipReason::ArityMismatch {
                    elements: 1,
                    fields: 2,
                }),
            ]
        );
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            SkipReason::ArityMismatch {
                elements: 2,
                fields: 3
            }
            .to_string(),
            "2 elements for 3 fields"
        );
        assert_eq!(
            SkipReason::NotStruct("[]int".to_string()).to_string(),
            "[]int is not a struct type"
        );
        assert!(SkipReason::Unresolved.is_notable());
        assert!(!SkipReason::AlreadyKeyed.is_notable());
    }
}
