//! CLI argument definitions using clap.
//!
//! `keyfix [-l] [-w] [-v] [path ...]`; with no paths the source is read from
//! stdin.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Input, Options};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Add field names to unkeyed Go struct literals",
    long_about = None
)]
pub struct Arguments {
    /// List files whose literals would be keyed
    #[arg(short = 'l')]
    pub list: bool,

    /// Write the result to the source file instead of stdout
    #[arg(short = 'w')]
    pub write: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Go files or directories; stdin is read when none are given
    pub paths: Vec<PathBuf>,
}

impl Arguments {
    pub fn options(&self) -> Options {
        Options::new(self.list, self.write, self.verbose)
    }

    pub fn into_input(self) -> Input {
        Input::from_paths(self.paths)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_flags_and_paths() {
        let args = Arguments::try_parse_from(["keyfix", "-l", "-w", "a.go", "pkg"]).unwrap();

        assert_eq!(
            args.options(),
            Options {
                emit_text: false,
                list_changed: true,
                overwrite: true,
                verbose: false,
            }
        );
        assert_eq!(
            args.into_input(),
            Input::Paths(vec![PathBuf::from("a.go"), PathBuf::from("pkg")])
        );
    }

    #[test]
    fn test_no_paths_reads_stdin() {
        let args = Arguments::try_parse_from(["keyfix", "--verbose"]).unwrap();

        assert!(args.options().verbose);
        assert!(args.options().emit_text);
        assert_eq!(args.into_input(), Input::Stdin);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Arguments::try_parse_from(["keyfix", "-x"]).is_err());
    }
}
