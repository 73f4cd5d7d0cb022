use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::config::Platform;
use crate::models::{ExecutionStatus, RootReport};

/// Create a JSON summary of a parser run.
///
/// One entry per evidence root, listing every module outcome with its log
/// path. The per-module log files stay the authoritative record.
///
/// # Example Output
///
/// ```json
/// {
///   "run_id": "550e8400-e29b-41d4-a716-446655440000",
///   "started": "2024-01-15T14:30:52+01:00",
///   "finished": "2024-01-15T15:02:10+01:00",
///   "parser_version": "0.3.0",
///   "platform": "linux",
///   "failed_modules": 1,
///   "roots": [{ "path": "...", "total": 18, "modules": [...] }]
/// }
/// ```
pub fn create_run_summary(
    started: DateTime<Local>,
    finished: DateTime<Local>,
    platform: Platform,
    reports: &[RootReport],
) -> Result<String> {
    let roots: Vec<_> = reports
        .iter()
        .map(|report| {
            let modules: Vec<_> = report
                .outcomes
                .iter()
                .map(|outcome| {
                    json!({
                        "identifier": outcome.module_identifier,
                        "status": outcome.status,
                        "log_path": outcome.log_path,
                    })
                })
                .collect();
            json!({
                "path": report.root.full_path,
                "name": report.root.name,
                "total": report.total,
                "completed": report.completed(),
                "modules": modules,
            })
        })
        .collect();

    let summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "started": started.to_rfc3339(),
        "finished": finished.to_rfc3339(),
        "parser_version": env!("CARGO_PKG_VERSION"),
        "platform": platform.to_string(),
        "failed_modules": failed_count(reports),
        "roots": roots,
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")
}

pub fn write_run_summary(path: &Path, summary: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, summary).context(format!("Failed to write run summary: {}", path.display()))?;
    info!("Run summary written to {}", path.display());
    Ok(())
}

fn failed_count(reports: &[RootReport]) -> usize {
    reports.iter().map(|r| r.count(ExecutionStatus::Failed)).sum()
}

/// Log every failed module with its `_failed.txt` log, grouped by root.
///
/// Returns how many failures were listed.
pub fn report_failures(reports: &[RootReport]) -> usize {
    let failed = failed_count(reports);
    if failed == 0 {
        return 0;
    }

    warn!("{} module run(s) failed:", failed);
    for report in reports {
        for outcome in report
            .outcomes
            .iter()
            .filter(|o| o.status == ExecutionStatus::Failed)
        {
            match &outcome.log_path {
                Some(log) => warn!("  • {} [{}]: {}", report.root.name, outcome.module_identifier, log.display()),
                None => warn!("  • {} [{}]", report.root.name, outcome.module_identifier),
            }
        }
    }
    failed
}
