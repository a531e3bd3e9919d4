use std::io;

use anyhow::Result;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use report::print_error;

mod args;
mod exit_status;
mod report;
mod run;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let options = args.options();
    let input = args.into_input();

    run::run(options, input, &mut io::stdout().lock())?;
    Ok(ExitStatus::Success)
}
