//! Exit code definitions for the bup CLI
//!
//! Scripts rely on these values. Changing one is a breaking change.

use bup_core::Error;

/// Exit codes for the bup CLI application.
///
/// Precondition failures are reported before any store call. Operational
/// failures mean the store was contacted and at least one operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// Missing configuration, invalid arguments or unusable local path
    UsageError = 1,

    /// At least one upload failed, or the listing failed
    OperationFailed = 2,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        if err.is_fatal() {
            Self::UsageError
        } else {
            Self::OperationFailed
        }
    }
}
