//! Stable exit codes for resell CLI commands.

/// Session completed and a decision was presented.
pub const OK: i32 = 0;
/// Invalid configuration or parameters, or a device failure aborted the session.
pub const INVALID: i32 = 1;
