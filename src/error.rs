//! Process exit codes.

use crate::pipeline::PipelineError;

/// Exit codes for the flatdupe application.
///
/// - 0: Success, including runs where some files were skipped and reported
/// - 1: Wrong arguments, or a fatal error other than an invalid root
/// - 2: The given path is not a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The pipeline reached its summary.
    Success = 0,
    /// Usage error or unexpected failure.
    GeneralError = 1,
    /// The root argument is not a directory.
    InvalidRoot = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix used in fatal error lines.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FD000",
            Self::GeneralError => "FD001",
            Self::InvalidRoot => "FD002",
        }
    }

    /// Pick the exit code for an error that ended the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::InvalidRoot(_)) => Self::InvalidRoot,
            _ => Self::GeneralError,
        }
    }
}
