//! Go source parsing.
//!
//! - `lexer`: `logos`-based tokenizer with Go's automatic semicolons
//! - `parser`: recursive-descent parser producing [`crate::core::ast::File`]

pub mod lexer;
pub mod parser;

pub use parser::parse_file;
