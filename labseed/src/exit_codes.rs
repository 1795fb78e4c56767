//! Stable exit codes for labseed CLI commands.

use crate::core::error::LabError;

/// Command succeeded (and, for `check`, every validator passed).
pub const OK: i32 = 0;
/// Invalid declaration, config, arguments, or any other failure.
pub const INVALID: i32 = 1;
/// An input file does not exist.
pub const NOT_FOUND: i32 = 2;
/// `labseed check` ran but at least one validator failed.
pub const CHECK_FAILED: i32 = 3;

/// Map a command error to its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LabError>() {
        Some(LabError::NotFound { .. }) => NOT_FOUND,
        _ => INVALID,
    }
}
