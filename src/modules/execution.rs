//! Program execution evidence: Amcache, ShimCache and prefetch.

use super::artifacts::{find_dir_named_ignore_case, find_file_named};
use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const AMCACHE_PARSER: &str = "module_AmcacheParser";
pub const APP_COMPAT_CACHE_PARSER: &str = "module_AppCompatCacheParser";
pub const PREFETCH_RUN_COUNTS: &str = "module_prefetchruncounts";
pub const PECMD: &str = "module_PECmd";

pub fn amcache_parser(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(hive) = find_file_named(ctx.source, "Amcache.hve") else {
        return ModuleResult::missing_artifact();
    };
    let arguments = format!("-f {} --csv {} -i --mp", quoted(&hive), quoted(ctx.dest));
    ctx.run(&ctx.tools.amcache_parser, &arguments, &ctx.log_file(), None)
}

pub fn app_compat_cache_parser(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(hive) = find_file_named(ctx.source, "SYSTEM") else {
        return ModuleResult::missing_artifact();
    };
    let arguments = format!("-f {} --csv {}", quoted(&hive), quoted(ctx.dest));
    ctx.run(&ctx.tools.app_compat_cache_parser, &arguments, &ctx.log_file(), None)
}

/// Linux prefetch variant. The script prints CSV, so its log is the result.
pub fn prefetch_run_counts(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(prefetch_dir) = find_dir_named_ignore_case(ctx.source, "prefetch") else {
        return ModuleResult::missing_artifact();
    };
    let log_file = ctx.log_file_in(ctx.dest, ".csv");
    ctx.run(&ctx.tools.prefetchruncounts, &quoted(&prefetch_dir), &log_file, None)
}

/// Windows prefetch variant
pub fn pecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let arguments = format!("-d {} --csv {} --mp -q", quoted(ctx.source), quoted(ctx.dest));
    ctx.run(&ctx.tools.pecmd, &arguments, &ctx.log_file(), None)
}
