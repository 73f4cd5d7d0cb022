//! Per-root module fan-out.
//!
//! Every module of a root gets its own named thread. Finished modules report
//! over a channel, and the controlling thread turns those reports into
//! progress lines in completion order. A heartbeat is logged whenever nothing
//! finishes for [`PROGRESS_HEARTBEAT`].

use std::collections::BTreeSet;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam::channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};

use crate::config::ToolConfig;
use crate::constants::{timestamp, PROGRESS_HEARTBEAT};
use crate::models::{EvidenceRoot, ExecutionOutcome, ModuleResult, RootReport};
use crate::modules::{ModuleCatalog, ModuleContext, ModuleDescriptor};
use crate::runner::ProcessRunner;

/// Lifecycle of one root inside the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Scheduling,
    Running,
    Draining,
    Complete,
}

/// What to run against each root.
#[derive(Debug, Clone, Copy)]
pub enum ExecutionPlan<'c> {
    /// Every active module, under its category directory
    Catalog(&'c ModuleCatalog),
    /// One module, directly under the result directory
    Single(&'c ModuleDescriptor),
}

struct PreparedTask<'c> {
    descriptor: &'c ModuleDescriptor,
    dest: PathBuf,
}

/// Slot in the optional per-root concurrency cap, released on drop
struct Permit<'p> {
    release: &'p Receiver<()>,
}

impl<'p> Permit<'p> {
    fn acquire(slots: &'p (Sender<()>, Receiver<()>)) -> Self {
        // Blocks while `cap` permits are out
        let _ = slots.0.send(());
        Permit { release: &slots.1 }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.release.recv();
    }
}

/// `<timestamp>: <identifier> finished (<completed>/<total>).`
pub fn progress_line(identifier: &str, completed: usize, total: usize) -> String {
    format!("{}: {} finished ({}/{}).", timestamp(), identifier, completed, total)
}

/// Runs the modules of one evidence root and waits for all of them.
pub struct ModuleScheduler<'a> {
    tools: &'a ToolConfig,
    runner: &'a ProcessRunner,
    max_concurrency: Option<usize>,
    heartbeat: Duration,
    progress: Option<Sender<String>>,
}

impl<'a> ModuleScheduler<'a> {
    pub fn new(tools: &'a ToolConfig, runner: &'a ProcessRunner) -> Self {
        ModuleScheduler {
            tools,
            runner,
            max_concurrency: None,
            heartbeat: PROGRESS_HEARTBEAT,
            progress: None,
        }
    }

    /// Cap simultaneous modules per root. `None` or `0` means no cap.
    pub fn with_max_concurrency(mut self, cap: Option<usize>) -> Self {
        self.max_concurrency = cap.filter(|&cap| cap > 0);
        self
    }

    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// Also send every progress line to `sink`
    pub fn with_progress(mut self, sink: Sender<String>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    pub fn run(&self, root: &EvidenceRoot, plan: ExecutionPlan<'_>) -> RootReport {
        match plan {
            ExecutionPlan::Catalog(catalog) => self.run_catalog(root, catalog),
            ExecutionPlan::Single(descriptor) => self.run_single(root, descriptor),
        }
    }

    /// Create every category directory, then run all active modules at once.
    ///
    /// Always completes: module failures only show up in the outcomes.
    pub fn run_catalog(&self, root: &EvidenceRoot, catalog: &ModuleCatalog) -> RootReport {
        transition(root, SchedulerState::Scheduling);

        let result_dir = root.result_dir();
        let mut tasks = Vec::with_capacity(catalog.module_count());
        for category in catalog.categories() {
            let dest = result_dir.join(&category.name);
            if let Err(e) = fs::create_dir_all(&dest) {
                warn!("Failed to create {}: {}", dest.display(), e);
            }
            for descriptor in &category.modules {
                tasks.push(PreparedTask {
                    descriptor,
                    dest: dest.clone(),
                });
            }
        }

        self.execute(root, &tasks)
    }

    /// Run one module inline into `<root>/WindowsParser/<identifier>/`.
    pub fn run_single(&self, root: &EvidenceRoot, descriptor: &ModuleDescriptor) -> RootReport {
        let dest = root.result_dir().join(&descriptor.identifier);
        if let Err(e) = fs::create_dir_all(&dest) {
            warn!("Failed to create {}: {}", dest.display(), e);
        }

        let result = self.invoke_guarded(root.path(), &dest, descriptor);
        self.report_progress(&descriptor.identifier, 1, 1);

        RootReport {
            root: root.clone(),
            total: 1,
            outcomes: vec![outcome(descriptor, result)],
        }
    }

    fn execute(&self, root: &EvidenceRoot, tasks: &[PreparedTask<'_>]) -> RootReport {
        let total = tasks.len();
        let mut outcomes = Vec::with_capacity(total);
        let permits = self.max_concurrency.map(bounded::<()>);
        let permits = permits.as_ref();

        let scope_result = crossbeam::scope(|scope| {
            transition(root, SchedulerState::Running);
            let (done_tx, done_rx) = unbounded::<ExecutionOutcome>();
            let mut running = BTreeSet::new();

            for task in tasks {
                let done_tx = done_tx.clone();
                let identifier = task.descriptor.identifier.as_str();
                let spawned = scope
                    .builder()
                    .name(identifier.to_string())
                    .spawn(move |_| {
                        let _permit = permits.map(Permit::acquire);
                        let result = self.invoke_guarded(root.path(), &task.dest, task.descriptor);
                        let _ = done_tx.send(outcome(task.descriptor, result));
                    });

                match spawned {
                    Ok(_) => {
                        running.insert(identifier);
                    }
                    Err(e) => {
                        error!("Failed to start {}: {}", identifier, e);
                        outcomes.push(outcome(task.descriptor, ModuleResult::failed()));
                        self.report_progress(identifier, outcomes.len(), total);
                    }
                }
            }
            drop(done_tx);

            transition(root, SchedulerState::Draining);
            while outcomes.len() < total {
                match done_rx.recv_timeout(self.heartbeat) {
                    Ok(finished) => {
                        running.remove(finished.module_identifier.as_str());
                        let completed = outcomes.len() + 1;
                        self.report_progress(&finished.module_identifier, completed, total);
                        outcomes.push(finished);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        debug!(
                            "{}: still running {}",
                            root.name,
                            running.iter().copied().collect::<Vec<_>>().join(", ")
                        );
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        if scope_result.is_err() {
            error!("A module thread for {} panicked outside its guard", root.name);
        }
        transition(root, SchedulerState::Complete);

        RootReport {
            root: root.clone(),
            total,
            outcomes,
        }
    }

    fn report_progress(&self, identifier: &str, completed: usize, total: usize) {
        let line = progress_line(identifier, completed, total);
        info!("{}", line);
        if let Some(sink) = &self.progress {
            let _ = sink.send(line);
        }
    }

    /// Run a module, turning a panic into `Failed` so siblings are unaffected
    fn invoke_guarded(&self, source: &Path, dest: &Path, descriptor: &ModuleDescriptor) -> ModuleResult {
        let ctx = ModuleContext {
            source,
            dest,
            identifier: &descriptor.identifier,
            tools: self.tools,
            runner: self.runner,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| (descriptor.invoke)(&ctx))) {
            Ok(result) => result,
            Err(_) => {
                error!("{} panicked", descriptor.identifier);
                ModuleResult::failed()
            }
        }
    }
}

fn outcome(descriptor: &ModuleDescriptor, result: ModuleResult) -> ExecutionOutcome {
    ExecutionOutcome {
        module_identifier: descriptor.identifier.clone(),
        status: result.status,
        log_path: result.log_path,
    }
}

fn transition(root: &EvidenceRoot, state: SchedulerState) {
    debug!("{}: {:?}", root.name, state);
}
