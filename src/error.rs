//! Exit codes and structured error reporting.

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::signal::EXIT_CODE_INTERRUPTED;

/// Process exit codes.
///
/// - 0: run completed, whether or not duplicates were found
/// - 1: traversal, hashing, deletion or configuration failure
/// - 3: deletion was requested but not confirmed
/// - 130: interrupted by Ctrl+C
///
/// 2 is left to clap for usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The run completed.
    Success,
    /// An error stopped the run.
    GeneralError,
    /// The user declined the deletion prompt.
    Declined,
    /// Ctrl+C stopped the run.
    Interrupted,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::GeneralError => 1,
            Self::Declined => 3,
            Self::Interrupted => EXIT_CODE_INTERRUPTED,
        }
    }

    /// Machine-readable code shown in error messages.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::Declined => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Pick the exit code for an error returned by the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let interrupted = err
            .chain()
            .any(|cause| matches!(cause.downcast_ref::<FinderError>(), Some(FinderError::Interrupted)));
        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Machine-readable code (e.g. "DS001")
    pub code: String,
    /// Numeric exit code
    pub exit_code: i32,
    /// Error message including its causes
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Build from an error and the exit code chosen for it.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
