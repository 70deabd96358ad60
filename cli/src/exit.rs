//! Process exit statuses.

use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command finished, or help/version was printed
    Success,
    /// Unhandled error
    Failure,
    /// Interrupted before the command finished
    Aborted,
    /// No command given where one was required
    MissingCommand,
    /// Unexpected extra positional argument
    ExtraArgument,
    /// Unknown subcommand
    Usage,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Aborted => 2,
            ExitStatus::MissingCommand => 3,
            ExitStatus::ExtraArgument => 4,
            ExitStatus::Usage => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
