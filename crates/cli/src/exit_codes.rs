//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, bad upload)   |
//! | 3-9     | report    | Report loading / export codes            |
//! | 50-59   | api       | Reconciliation service codes             |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid upload files, bad closing date.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Report (3-9)
// =============================================================================

/// Report payload did not parse (not JSON, or not a report).
pub const EXIT_REPORT_PARSE: u8 = 3;

/// IO error reading local files or writing an export.
pub const EXIT_IO: u8 = 4;

// =============================================================================
// API (50-59) — reconciliation service
// =============================================================================

/// Cannot reach the service (connection refused, DNS, timeout).
pub const EXIT_API_CONNECT: u8 = 50;

/// Service answered with a non-success HTTP status.
pub const EXIT_API_STATUS: u8 = 51;

/// Service answered 2xx but the payload did not decode.
pub const EXIT_API_DECODE: u8 = 52;

use crate::api::ApiError;

/// Map an ApiError to its exit code.
pub fn api_exit_code(err: &ApiError) -> u8 {
    match err {
        ApiError::Connect(_) => EXIT_API_CONNECT,
        ApiError::Status { .. } => EXIT_API_STATUS,
        ApiError::Decode(_) => EXIT_API_DECODE,
        ApiError::Io(_) => EXIT_IO,
    }
}
