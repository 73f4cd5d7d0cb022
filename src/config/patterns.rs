use std::fs;
use std::path::Path;

use log::info;
use regex::Regex;

use crate::constants::{DEFAULT_PATTERNS, DEFAULT_PATTERN_SOURCE};
use crate::error::ParserError;

/// Compiled evidence-root name patterns, in file order.
#[derive(Debug, Clone)]
pub struct TargetPatterns {
    patterns: Vec<Regex>,
}

impl TargetPatterns {
    /// Parse newline separated regular expressions. Lines are trimmed and
    /// blank ones dropped.
    pub fn parse(content: &str) -> Result<Self, ParserError> {
        let mut patterns = Vec::new();
        for line in content.lines() {
            let pattern = line.trim();
            if pattern.is_empty() {
                continue;
            }
            info!("Found pattern: \"{}\"", pattern);
            let regex = Regex::new(pattern).map_err(|source| ParserError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            patterns.push(regex);
        }
        Ok(TargetPatterns { patterns })
    }

    /// Load from a pattern file
    pub fn from_file(path: &Path) -> Result<Self, ParserError> {
        let content = fs::read_to_string(path).map_err(|source| ParserError::PatternFile {
            path: path.to_path_buf(),
            source,
        })?;
        info!("using patterns from {}", path.display());
        Self::parse(&content)
    }

    /// The list bundled with the binary
    pub fn bundled() -> Result<Self, ParserError> {
        info!("using patterns from {}", DEFAULT_PATTERN_SOURCE);
        Self::parse(DEFAULT_PATTERNS)
    }

    /// `-f` file when given, bundled list otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ParserError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    /// Unanchored search of `name` against each pattern; first hit wins
    pub fn first_match(&self, name: &str) -> Option<&Regex> {
        self.patterns.iter().find(|p| p.is_match(name))
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.first_match(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
