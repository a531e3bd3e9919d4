//! Error types for the rewrite pipeline.
//!
//! Only failures that abort processing of an input live here. Literals whose
//! type cannot be resolved are not errors; the classifier simply leaves them
//! alone.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use super::source::{Position, SourceFile};

/// A positioned syntax error, rendered as `file:line:col: message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub file: String,
    pub position: Position,
    pub message: String,
    /// The offending source line, kept for verbose excerpts.
    pub source_line: String,
}

impl SyntaxError {
    pub fn at(source: &SourceFile, offset: usize, message: impl Into<String>) -> Self {
        let position = source.position(offset);
        Self {
            file: source.name().to_string(),
            position,
            message: message.into(),
            source_line: source.line_text(position.line).to_string(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.position, self.message)
    }
}

/// Every syntax error found in one input, possibly across several files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxErrors(Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn push(&mut self, error: SyntaxError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: SyntaxErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }
}

impl From<SyntaxError> for SyntaxErrors {
    fn from(error: SyntaxError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxErrors {}

#[derive(Debug, Error)]
pub enum KeyfixError {
    #[error("{0}")]
    Syntax(SyntaxErrors),

    #[error("{}: not a Go file within a package", .0.display())]
    NotInPackage(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl KeyfixError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SyntaxErrors> for KeyfixError {
    fn from(errors: SyntaxErrors) -> Self {
        Self::Syntax(errors)
    }
}

pub type Result<T> = std::result::Result<T, KeyfixError>;
