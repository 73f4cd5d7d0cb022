//! External tool execution.

mod process;

pub use process::{failed_log_path, quote_if_spaced, ProcessRunner};
