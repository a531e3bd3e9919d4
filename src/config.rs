//! Run configuration derived from the command line.
//!
//! There is no configuration file; flags are turned into an [`Options`]
//! value, which is checked against the kind of [`Input`] before anything is
//! read.

use std::path::PathBuf;

use crate::core::errors::{KeyfixError, Result};

/// Where the source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    /// Files and directories, in command-line order.
    Paths(Vec<PathBuf>),
}

impl Input {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        if paths.is_empty() {
            Self::Stdin
        } else {
            Self::Paths(paths)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Print the rewritten text to stdout.
    pub emit_text: bool,
    /// Print the name of every input that needs a change.
    pub list_changed: bool,
    /// Write rewritten files back in place.
    pub overwrite: bool,
    /// Diagnostics on stderr.
    pub verbose: bool,
}

impl Options {
    pub fn new(list_changed: bool, overwrite: bool, verbose: bool) -> Self {
        Self {
            emit_text: !list_changed && !overwrite,
            list_changed,
            overwrite,
            verbose,
        }
    }

    /// Reject combinations that cannot work for `input`.
    pub fn validate(&self, input: &Input) -> Result<()> {
        if self.overwrite && *input == Input::Stdin {
            return Err(KeyfixError::Usage("can't use -w on stdin".to_string()));
        }
        Ok(())
    }

    /// Whether rewritten text has to be produced at all.
    pub fn needs_text(&self) -> bool {
        self.emit_text || self.overwrite
    }
}
