//! Global constants for the windows-parser application.
//!
//! This module centralizes all hardcoded values so the output layout and
//! scheduling parameters live in one place.

use std::time::Duration;

// Output layout
/// Name of the result directory created inside every evidence root
pub const ROOT_RESULT_DIR: &str = "WindowsParser";

/// Suffix every module log is expected to carry
pub const LOG_SUFFIX: &str = ".txt";

/// Suffix substituted for [`LOG_SUFFIX`] when a tool exits nonzero
pub const FAILED_LOG_SUFFIX: &str = "_failed.txt";

/// Prefix shared by every module log file name
pub const LOG_PREFIX: &str = "output_";

// Scheduling
/// Number of evidence roots processed concurrently in batch mode
pub const ROOT_WORKER_COUNT: usize = 2;

/// Interval between "still running" heartbeats while a root drains
pub const PROGRESS_HEARTBEAT: Duration = Duration::from_secs(5);

/// Timestamp format used in progress lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Patterns
/// Pattern list shipped with the binary, used when no `-f` file is given
pub const DEFAULT_PATTERNS: &str = include_str!("../config/target.txt");

/// Display name for the bundled pattern list
pub const DEFAULT_PATTERN_SOURCE: &str = "bundled target.txt";

/// Format a local timestamp the way progress lines expect it
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Build the log file name for a module identifier
pub fn log_file_name(identifier: &str) -> String {
    format!("{}{}{}", LOG_PREFIX, identifier, LOG_SUFFIX)
}
