use std::process::ExitCode;

/// Exit status of a run.
///
/// - `Success` (0): every input was processed
/// - `Error` (1): a parse, I/O or usage error stopped the run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(1),
        }
    }
}
