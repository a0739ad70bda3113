//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed catalog document)
pub const DATAERR: i32 = 65;

/// Cannot open input (e.g. no templates)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Terminated by a second Ctrl-C (128 + SIGINT)
pub const INTERRUPTED: i32 = 130;
