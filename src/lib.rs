//! keyfix - add field names to unkeyed Go struct literals
//!
//! keyfix rewrites positional composite literals of struct type, such as
//! `Point{1, 2}`, into keyed ones, `Point{X: 1, Y: 2}`. Types are resolved
//! statically across the files of the package and the packages it imports
//! from the same module or the standard library. The rewrite only inserts
//! text; every other byte of the file is kept.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, orchestration, reporting)
//! - `config`: Run options and input validation
//! - `core`: Go front end, type resolution and the keying engine

pub mod cli;
pub mod config;
pub mod core;
