//! Finding evidence roots under a case directory.

use std::path::Path;

use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::TargetPatterns;
use crate::constants::timestamp;
use crate::error::ParserError;
use crate::models::EvidenceRoot;

/// Walks a target directory and keeps every directory whose base name
/// matches one of the patterns.
pub struct EvidenceRootDiscoverer<'a> {
    patterns: &'a TargetPatterns,
}

impl<'a> EvidenceRootDiscoverer<'a> {
    pub fn new(patterns: &'a TargetPatterns) -> Self {
        EvidenceRootDiscoverer { patterns }
    }

    /// Walk `target_dir` to the end and return every matching directory.
    ///
    /// Nested matches qualify on their own. Order is the walk order and
    /// carries no meaning. Entries that cannot be read are logged and
    /// skipped. A symbolic link to a directory can be a root, but the walk
    /// never descends through one.
    pub fn discover(&self, target_dir: &Path) -> Result<Vec<EvidenceRoot>, ParserError> {
        if !target_dir.is_dir() {
            return Err(ParserError::TargetNotFound(target_dir.to_path_buf()));
        }
        info!("{}: Parsing {}...", timestamp(), target_dir.display());

        let mut roots = Vec::new();
        for entry in WalkDir::new(target_dir).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", target_dir.display(), e);
                    continue;
                }
            };
            if !is_directory(&entry) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if let Some(pattern) = self.patterns.first_match(&name) {
                debug!("{} matches \"{}\"", entry.path().display(), pattern.as_str());
                let full_path =
                    dunce::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
                roots.push(EvidenceRoot {
                    full_path,
                    name: name.into_owned(),
                });
            }
        }

        info!("Found {} evidence roots", roots.len());
        Ok(roots)
    }
}

/// A directory, or a symbolic link that resolves to one
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}
