//! Configuration-time errors.
//!
//! Only these are ever surfaced to the operator. Everything that goes wrong
//! while a tool runs ends up as a log file in the output tree instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("module not found: {0}")]
    ModuleNotFound(String),

    #[error("module identifier registered twice: {0}")]
    DuplicateModule(String),

    #[error("invalid target pattern \"{pattern}\"")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read pattern file {}", .path.display())]
    PatternFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
