//! Windows event log integrations.
//!
//! Everything here except EvtxECmd needs at least one `.evtx` file under the
//! root; the directory of the first one found is handed to the tool.

use super::artifacts::{find_evtx_dir, find_file_named};
use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const HAYABUSA_LOGON: &str = "module_hayabusa_logon";
pub const HAYABUSA_TIMELINE: &str = "module_hayabusa_timeline";
pub const CHAINSAW: &str = "module_chainsaw";
pub const EVTXECMD: &str = "module_EvtxECmd";
pub const SCRIPT_BLOCK_POWERSHELL: &str = "module_script_block_powershell";
pub const ZIRCOLITE: &str = "module_zircolite";

const POWERSHELL_OPERATIONAL_LOG: &str = "Microsoft-Windows-PowerShell%4Operational.evtx";

pub fn hayabusa_logon(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(evtx_dir) = find_evtx_dir(ctx.source) else {
        return ModuleResult::missing_artifact();
    };
    let Some(result_dir) = ctx.subdir("hayabusa") else {
        return ModuleResult::failed();
    };

    let summary = result_dir.join("logon-summary.csv");
    let arguments = format!(
        "logon-summary -q --no-color -d {} -o {}",
        quoted(&evtx_dir),
        quoted(&summary)
    );
    let log_file = ctx.log_file_in(&result_dir, "_logon.txt");
    ctx.run(&ctx.tools.hayabusa, &arguments, &log_file, Some(&ctx.tools.hayabusa_dir))
}

pub fn hayabusa_timeline(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(evtx_dir) = find_evtx_dir(ctx.source) else {
        return ModuleResult::missing_artifact();
    };
    let Some(result_dir) = ctx.subdir("hayabusa") else {
        return ModuleResult::failed();
    };

    let timeline = result_dir.join("timeline");
    let arguments = format!(
        "csv-timeline -q --no-color -w -T -H \"{}_overview.html\" -d {} -o \"{}.csv\"",
        timeline.display(),
        quoted(&evtx_dir),
        timeline.display()
    );
    let log_file = ctx.log_file_in(&result_dir, "_timeline.txt");
    ctx.run(&ctx.tools.hayabusa, &arguments, &log_file, Some(&ctx.tools.hayabusa_dir))
}

/// SIGMA and chainsaw rule hunt over the event directory
pub fn chainsaw(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(evtx_dir) = find_evtx_dir(ctx.source) else {
        return ModuleResult::missing_artifact();
    };
    let Some(result_dir) = ctx.subdir("chainsaw") else {
        return ModuleResult::failed();
    };

    let home = &ctx.tools.chainsaw_dir;
    let arguments = format!(
        "hunt {} --rule {} --sigma {} --mapping {} --csv --output {} --full --skip-errors",
        quoted(&evtx_dir),
        quoted(&home.join("rules")),
        quoted(&home.join("sigma")),
        quoted(&home.join("mappings").join("sigma-event-logs-all.yml")),
        quoted(&result_dir)
    );
    let log_file = ctx.log_file_in(&result_dir, ".txt");
    ctx.run(&ctx.tools.chainsaw, &arguments, &log_file, Some(home))
}

/// JSON export for SOF-ELK ingestion. EvtxECmd walks the root itself.
pub fn evtxecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(result_dir) = ctx.subdir("sofelk_evtx") else {
        return ModuleResult::failed();
    };

    let arguments = format!("-d {} --json {}", quoted(ctx.source), quoted(&result_dir));
    let log_file = ctx.log_file_in(&result_dir, ".txt");
    ctx.run(&ctx.tools.evtxecmd, &arguments, &log_file, None)
}

pub fn script_block_powershell(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(operational_log) = find_file_named(ctx.source, POWERSHELL_OPERATIONAL_LOG) else {
        return ModuleResult::missing_artifact();
    };
    let Some(result_dir) = ctx.subdir("powershell_script_block") else {
        return ModuleResult::failed();
    };

    let arguments = format!("-e {} -o {} -s", quoted(&operational_log), quoted(&result_dir));
    let log_file = ctx.log_file_in(&result_dir, ".txt");
    ctx.run(&ctx.tools.script_block, &arguments, &log_file, Some(&ctx.tools.hayabusa_dir))
}

pub fn zircolite(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(evtx_dir) = find_evtx_dir(ctx.source) else {
        return ModuleResult::missing_artifact();
    };
    let Some(result_dir) = ctx.subdir("zircolite") else {
        return ModuleResult::failed();
    };

    let home = &ctx.tools.zircolite_dir;
    let arguments = format!(
        "--events {} --ruleset {} --outfile {} --dbfile {} --config {} --evtx_dump \"{}\"",
        quoted(&evtx_dir),
        quoted(&home.join("rules").join("rules_windows_generic_pysigma.json")),
        quoted(&result_dir.join("Zircolite_detections.json")),
        quoted(&result_dir.join("Zircolite_detections.db")),
        quoted(&home.join("config").join("fieldMappings.json")),
        ctx.tools.zircolite_evtx_dump
    );
    let log_file = ctx.log_file_in(&result_dir, ".txt");
    // Runs from the runner's default temp directory
    ctx.run(&ctx.tools.zircolite, &arguments, &log_file, None)
}
