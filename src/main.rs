use std::process::ExitCode;

use clap::Parser;
use keyfix::cli::{Arguments, ExitStatus, print_error};

fn main() -> ExitCode {
    let args = Arguments::parse();
    let verbose = args.verbose;

    match keyfix::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            print_error(&err, verbose);
            ExitStatus::Error.into()
        }
    }
}
