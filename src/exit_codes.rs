//! Exit code constants for the cmdfill CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unusable template or values)
//! - 2: Configuration error (unreadable or invalid config file)
//! - 130: Fill session cancelled by the user

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid input.
pub const USER_ERROR: i32 = 1;

/// Configuration file could not be parsed or failed validation.
pub const CONFIG_ERROR: i32 = 2;

/// The interactive fill was cancelled before submission.
pub const CANCELLED: i32 = 130;
