use std::fs;

use anyhow::{anyhow, Context, Result};
use crossbeam::channel::unbounded;
use log::{info, warn};

use crate::constants::{timestamp, ROOT_WORKER_COUNT};
use crate::models::{EvidenceRoot, RootReport};
use crate::scheduler::{ExecutionPlan, ModuleScheduler};

/// Hands evidence roots to a small pool of workers, each running one root
/// to completion before taking the next.
pub struct RootDispatcher<'a> {
    scheduler: ModuleScheduler<'a>,
    workers: usize,
}

impl<'a> RootDispatcher<'a> {
    pub fn new(scheduler: ModuleScheduler<'a>) -> Self {
        RootDispatcher {
            scheduler,
            workers: ROOT_WORKER_COUNT,
        }
    }

    /// Prepare `<root>/WindowsParser/` and run the plan against the root on
    /// the calling thread
    pub fn process_root(&self, root: &EvidenceRoot, plan: ExecutionPlan<'_>) -> Result<RootReport> {
        let dest = root.result_dir();
        info!("{}: Destination directory set to {}", timestamp(), dest.display());
        fs::create_dir_all(&dest)
            .context(format!("Failed to create result directory: {}", dest.display()))?;

        Ok(self.scheduler.run(root, plan))
    }

    /// Process every root with at most `ROOT_WORKER_COUNT` at a time.
    ///
    /// A root that cannot be prepared is logged and left out of the
    /// reports. Reports come back in completion order.
    pub fn dispatch(&self, roots: Vec<EvidenceRoot>, plan: ExecutionPlan<'_>) -> Result<Vec<RootReport>> {
        if roots.is_empty() {
            info!("No evidence roots to process");
            return Ok(Vec::new());
        }

        let width = self.workers.min(roots.len());
        let (work_tx, work_rx) = unbounded::<EvidenceRoot>();
        for root in roots {
            work_tx.send(root).context("Failed to queue evidence root")?;
        }
        drop(work_tx);

        let (report_tx, report_rx) = unbounded::<RootReport>();
        crossbeam::scope(|scope| -> Result<()> {
            for i in 0..width {
                let work_rx = work_rx.clone();
                let report_tx = report_tx.clone();
                scope
                    .builder()
                    .name(format!("root-worker-{}", i))
                    .spawn(move |_| {
                        for root in work_rx.iter() {
                            match self.process_root(&root, plan) {
                                Ok(report) => {
                                    let _ = report_tx.send(report);
                                }
                                Err(e) => warn!("Skipping {}: {:#}", root.full_path.display(), e),
                            }
                        }
                    })
                    .context(format!("Failed to start root worker {}", i))?;
            }
            Ok(())
        })
        .map_err(|_| anyhow!("A root worker panicked"))??;
        drop(report_tx);

        Ok(report_rx.iter().collect())
    }
}
