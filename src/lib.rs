//! # windows-parser
//!
//! Runs a fixed set of third-party forensic parsers over extracted Windows
//! triage collections and lays their output out in a predictable tree.
//!
//! ## Overview
//!
//! An evidence root is a directory holding one host's collected artifacts
//! (a KAPE or Velociraptor output folder, for instance). For every root the
//! parser creates `WindowsParser/<category>/` and runs each enabled module
//! in its own thread. A module looks for its artifact under the root, builds
//! the tool's command line and runs it; output lands in
//! `output_<identifier>.txt`, or `output_<identifier>_failed.txt` when the
//! tool fails. Logs that already exist are never redone, so an interrupted
//! run can simply be started again.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use windows_parser::config::{ModuleFlags, Platform, TargetPatterns, ToolConfig};
//! use windows_parser::discovery::EvidenceRootDiscoverer;
//! use windows_parser::dispatcher::RootDispatcher;
//! use windows_parser::modules::ModuleCatalog;
//! use windows_parser::runner::ProcessRunner;
//! use windows_parser::scheduler::{ExecutionPlan, ModuleScheduler};
//!
//! # fn main() -> anyhow::Result<()> {
//! let platform = Platform::current();
//! let tools = ToolConfig::for_platform(platform);
//! let runner = ProcessRunner::default();
//! let catalog = ModuleCatalog::build(&ModuleFlags::default(), platform)?;
//!
//! let patterns = TargetPatterns::bundled()?;
//! let roots = EvidenceRootDiscoverer::new(&patterns).discover(Path::new("/cases/2024-017"))?;
//!
//! let dispatcher = RootDispatcher::new(ModuleScheduler::new(&tools, &runner));
//! let reports = dispatcher.dispatch(roots, ExecutionPlan::Catalog(&catalog))?;
//! println!("Parsed {} evidence roots", reports.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: YAML configuration, module flags, tool locations, patterns
//! - [`runner`]: External process execution and log writing
//! - [`modules`]: Tool integrations, the module catalog and registry
//! - [`discovery`]: Evidence root discovery
//! - [`scheduler`]: Per-root module fan-out and progress
//! - [`dispatcher`]: Root-level worker pool
//! - [`utils`]: Run summary and failure reporting

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Application constants and configuration values
pub mod constants;

/// Configuration loading: YAML config, module flags, tool table, patterns
pub mod config;

pub mod discovery;

pub mod dispatcher;

/// Configuration-time error types
pub mod error;

/// Core data models shared by the scheduler and the reports
pub mod models;

pub mod modules;

/// External tool execution
pub mod runner;

pub mod scheduler;

/// Run summary and reporting helpers
pub mod utils;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
