//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid template, values, or warnings in strict mode
pub const VALIDATION_ERROR: i32 = 2;

/// Template error - placeholder without a value
pub const TEMPLATE_ERROR: i32 = 3;

/// Config error - missing or invalid configuration file
pub const CONFIG_ERROR: i32 = 4;

/// IO error - file not found, permission denied, missing cluster directory
pub const IO_ERROR: i32 = 5;

/// External tool error - sops missing or failed
pub const EXTERNAL_TOOL_ERROR: i32 = 6;
