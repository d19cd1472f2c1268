//! Standard exit codes (BSD sysexits.h compatible)

/// Generic failure (provisioning of the platform CLI failed)
pub const FAILURE: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Service unavailable (platform CLI could not be launched)
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
