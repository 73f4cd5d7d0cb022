//! Tool integrations and the tables that schedule them.
//!
//! ## Architecture
//!
//! ```text
//! ModuleRegistry (every integration, by identifier)     -m <module>
//!        │
//! ModuleCatalog  (enable flags + platform)               batch / -s
//!   ├── execution   Amcache, AppCompatCache, prefetch
//!   ├── ntfs        $MFT / $J
//!   ├── events      hayabusa, chainsaw, EvtxECmd, script blocks, zircolite
//!   ├── file        jump lists, recycle bin, shellbags, timeline, RecentFileCache
//!   ├── registry    RECmd batch files
//!   └── sqldata     SQLECmd
//! ```
//!
//! Each integration is a plain function from a [`ModuleContext`] to a
//! [`ModuleResult`]. It locates its input under the evidence root, builds
//! the tool's argument string and hands both to the [`ProcessRunner`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;

use crate::config::ToolConfig;
use crate::constants::{log_file_name, LOG_PREFIX};
use crate::models::ModuleResult;
use crate::runner::ProcessRunner;

mod artifacts;
mod catalog;
mod lookup;

pub mod events;
pub mod execution;
pub mod file;
pub mod ntfs;
pub mod registry;
pub mod sqldata;

pub use catalog::{CategoryTable, ModuleCatalog, ModuleCategory};
pub use lookup::ModuleRegistry;

/// Callable behind a module descriptor
pub type ModuleFn = Arc<dyn Fn(&ModuleContext<'_>) -> ModuleResult + Send + Sync>;

/// Everything a module needs for one invocation.
pub struct ModuleContext<'a> {
    /// Evidence root the artifacts are searched under
    pub source: &'a Path,
    /// Directory the tool writes into
    pub dest: &'a Path,
    pub identifier: &'a str,
    pub tools: &'a ToolConfig,
    pub runner: &'a ProcessRunner,
}

impl ModuleContext<'_> {
    /// `dest/output_<identifier>.txt`
    pub fn log_file(&self) -> PathBuf {
        self.dest.join(log_file_name(self.identifier))
    }

    /// `dir/output_<identifier><suffix>`, for modules with more than one
    /// log flavour or a non-text log
    pub fn log_file_in(&self, dir: &Path, suffix: &str) -> PathBuf {
        dir.join(format!("{}{}{}", LOG_PREFIX, self.identifier, suffix))
    }

    /// Create a tool-specific directory under `dest`
    pub fn subdir(&self, name: &str) -> Option<PathBuf> {
        let dir = self.dest.join(name);
        match fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                warn!("{}: failed to create {}: {}", self.identifier, dir.display(), e);
                None
            }
        }
    }

    pub fn run(
        &self,
        binary: &str,
        arguments: &str,
        log_file: &Path,
        working_dir: Option<&Path>,
    ) -> ModuleResult {
        self.runner.run(binary, arguments, log_file, working_dir)
    }
}

/// One integration: a unique identifier and the function that runs it.
///
/// The identifier doubles as the thread name and the log file stem.
#[derive(Clone)]
pub struct ModuleDescriptor {
    pub identifier: String,
    pub invoke: ModuleFn,
}

impl ModuleDescriptor {
    pub fn new<F>(identifier: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&ModuleContext<'_>) -> ModuleResult + Send + Sync + 'static,
    {
        ModuleDescriptor {
            identifier: identifier.into(),
            invoke: Arc::new(invoke),
        }
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Quote a path for an argument string so that splitting it with shell
/// rules gives back the path unchanged
pub(crate) fn quoted(path: &Path) -> String {
    let raw = path.to_string_lossy();
    match shlex::try_quote(&raw) {
        Ok(quoted) => quoted.into_owned(),
        // Only a NUL byte is rejected, and no real path carries one
        Err(_) => format!("\"{}\"", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus;

    #[test]
    fn test_log_file_names() {
        let tools = ToolConfig::linux();
        let runner = ProcessRunner::default();
        let ctx = ModuleContext {
            source: Path::new("/case/HOST_triage"),
            dest: Path::new("/case/HOST_triage/WindowsParser/file"),
            identifier: "module_RBCmd",
            tools: &tools,
            runner: &runner,
        };

        assert_eq!(
            ctx.log_file(),
            PathBuf::from("/case/HOST_triage/WindowsParser/file/output_module_RBCmd.txt")
        );
        assert_eq!(
            ctx.log_file_in(Path::new("/x"), "_logon.txt"),
            PathBuf::from("/x/output_module_RBCmd_logon.txt")
        );
    }

    #[test]
    fn test_descriptor_invokes_closure() {
        let descriptor = ModuleDescriptor::new("module_test", |_ctx| ModuleResult::missing_artifact());
        let tools = ToolConfig::linux();
        let runner = ProcessRunner::default();
        let ctx = ModuleContext {
            source: Path::new("/"),
            dest: Path::new("/"),
            identifier: &descriptor.identifier,
            tools: &tools,
            runner: &runner,
        };

        assert_eq!((descriptor.invoke)(&ctx).status, ExecutionStatus::MissingArtifact);
        assert!(format!("{:?}", descriptor).contains("module_test"));
    }

    #[test]
    fn test_quoted_survives_splitting() {
        for path in [
            "/case/a b",
            r"\\?\D:\case\HOST_triage",
            r"D:\case files\HOST_triage\C\$MFT",
            r#"/case/say "hi"/it's"#,
            "/case/$HOME/`x`",
        ] {
            let token = quoted(Path::new(path));
            assert_eq!(shlex::split(&token), Some(vec![path.to_string()]), "{}", token);
        }
    }
}
