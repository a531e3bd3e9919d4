//! The rewrite engine: Go front end, type resolution and keying.
//!
//! - `source`, `parsers`, `ast`: text, tokens and the syntax tree
//! - `package`, `importer`, `build`: compilation units, imported packages
//!   and the build constraints that filter their files
//! - `types`: static types of composite literals
//! - `keying`: eligibility rules and the edit script
//! - `fix`: one unit from loaded files to rewritten text

pub mod ast;
pub mod build;
pub mod errors;
pub mod fix;
pub mod importer;
pub mod keying;
pub mod package;
pub mod parsers;
pub mod source;
pub mod types;

pub use errors::{KeyfixError, Result, SyntaxError, SyntaxErrors};
pub use fix::{FixOutcome, UnitOutcome, fix_unit};
pub use importer::Goroot;
pub use package::{Unit, load_file_unit, load_file_units, load_stdin_unit};
