//! Stable exit codes for runcard CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config/registry/input or other errors.
pub const INVALID: i32 = 1;
/// The requested style id is not in the registry.
pub const UNKNOWN_STYLE: i32 = 2;
