//! Shared helpers for unit tests.

#![cfg(test)]

use anyhow::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::ToolConfig;
use crate::models::{ExecutionStatus, ModuleResult};
use crate::modules::ModuleDescriptor;

/// Lay out a small triage collection under `base/name` and return its path.
///
/// Holds Amcache.hve, SYSTEM, a Security event log and a prefetch entry,
/// but no `$MFT`.
pub fn create_evidence_root(base: &Path, name: &str) -> Result<PathBuf> {
    let root = base.join(name);

    fs::create_dir_all(root.join("C/Windows/AppCompat/Programs"))?;
    fs::create_dir_all(root.join("C/Windows/System32/config"))?;
    fs::create_dir_all(root.join("C/Windows/System32/winevt/Logs"))?;
    fs::create_dir_all(root.join("C/Windows/Prefetch"))?;

    fs::write(root.join("C/Windows/AppCompat/Programs/Amcache.hve"), b"regf")?;
    fs::write(root.join("C/Windows/System32/config/SYSTEM"), b"regf")?;
    fs::write(root.join("C/Windows/System32/winevt/Logs/Security.evtx"), b"ElfFile")?;
    fs::write(root.join("C/Windows/Prefetch/CMD.EXE-4A81B364.pf"), b"MAM")?;

    Ok(root)
}

/// Every tool replaced by `echo`, so a log holds the argument vector it got.
///
/// Tool homes point at the temp directory so working directories exist.
pub fn echo_tools() -> ToolConfig {
    uniform_tools("echo")
}

/// Every tool replaced by the same command
pub fn uniform_tools(command: &str) -> ToolConfig {
    let home = env::temp_dir();
    ToolConfig {
        amcache_parser: command.to_string(),
        app_compat_cache_parser: command.to_string(),
        pecmd: command.to_string(),
        prefetchruncounts: command.to_string(),
        jlecmd: command.to_string(),
        rbcmd: command.to_string(),
        sbecmd: command.to_string(),
        wxtcmd: command.to_string(),
        recent_file_cache_parser: command.to_string(),
        recmd: command.to_string(),
        sqlecmd: command.to_string(),
        mftecmd: command.to_string(),
        evtxecmd: command.to_string(),
        hayabusa: command.to_string(),
        chainsaw: command.to_string(),
        zircolite: command.to_string(),
        script_block: command.to_string(),
        zircolite_evtx_dump: command.to_string(),
        eztool_dir: home.clone(),
        hayabusa_dir: home.clone(),
        chainsaw_dir: home.clone(),
        zircolite_dir: home,
    }
}

/// A module that runs `sh -c <script>` with its log in `dest`
pub fn shell_module(identifier: &str, script: &str) -> ModuleDescriptor {
    let script = script.to_string();
    ModuleDescriptor::new(identifier, move |ctx| {
        let arguments = format!("-c '{}'", script);
        ctx.run("sh", &arguments, &ctx.log_file(), None)
    })
}

/// A module that sleeps for `delay` and succeeds without launching anything,
/// counting how many of its kind run at once.
pub fn tracked_module(
    identifier: &str,
    delay: Duration,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
) -> ModuleDescriptor {
    ModuleDescriptor::new(identifier, move |ctx| {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(delay);
        running.fetch_sub(1, Ordering::SeqCst);
        ModuleResult::with_log(ExecutionStatus::Success, ctx.log_file())
    })
}
