use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::ROOT_RESULT_DIR;

/// A directory identified as holding the artifacts of one triage target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvidenceRoot {
    pub full_path: PathBuf,
    pub name: String,
}

impl EvidenceRoot {
    /// Build a root from a path, using its base name as the display name
    pub fn from_path(full_path: PathBuf) -> Self {
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| full_path.to_string_lossy().to_string());
        EvidenceRoot { full_path, name }
    }

    /// `<root>/WindowsParser`
    pub fn result_dir(&self) -> PathBuf {
        self.full_path.join(ROOT_RESULT_DIR)
    }

    pub fn path(&self) -> &Path {
        &self.full_path
    }
}

/// How a single module invocation ended.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Tool exited 0 and its output was written to the log
    Success,
    /// Tool exited nonzero, could not be launched, or the module panicked
    Failed,
    /// The success log already existed, nothing was launched
    Skipped,
    /// The artifact the tool needs is absent under the root
    MissingArtifact,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Success => write!(f, "success"),
            ExecutionStatus::Failed => write!(f, "failed"),
            ExecutionStatus::Skipped => write!(f, "skipped"),
            ExecutionStatus::MissingArtifact => write!(f, "missing artifact"),
        }
    }
}

/// What a module (or a single tool run) produced, before the scheduler tags
/// it with the module identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleResult {
    pub status: ExecutionStatus,
    pub log_path: Option<PathBuf>,
}

impl ModuleResult {
    pub fn with_log(status: ExecutionStatus, log_path: PathBuf) -> Self {
        ModuleResult {
            status,
            log_path: Some(log_path),
        }
    }

    pub fn missing_artifact() -> Self {
        ModuleResult {
            status: ExecutionStatus::MissingArtifact,
            log_path: None,
        }
    }

    pub fn failed() -> Self {
        ModuleResult {
            status: ExecutionStatus::Failed,
            log_path: None,
        }
    }
}

/// Outcome of one module task, reported back to the scheduler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub module_identifier: String,
    pub status: ExecutionStatus,
    pub log_path: Option<PathBuf>,
}

/// Everything the scheduler learned while draining one root.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RootReport {
    pub root: EvidenceRoot,
    pub total: usize,
    /// Outcomes in completion order
    pub outcomes: Vec<ExecutionOutcome>,
}

impl RootReport {
    pub fn completed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, status: ExecutionStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn outcome(&self, identifier: &str) -> Option<&ExecutionOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.module_identifier == identifier)
    }
}
