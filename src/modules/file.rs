//! User file-activity artifacts.

use super::artifacts::find_file_named;
use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const JLECMD: &str = "module_JLECmd";
pub const RBCMD: &str = "module_RBCmd";
pub const SBECMD: &str = "module_SBECmd";
pub const WXTCMD: &str = "module_WxTCmd";
pub const RECENT_FILE_CACHE_PARSER: &str = "module_RecentFileCacheParser";

/// Jump lists
pub fn jlecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let arguments = format!("-d {} --csv {} --mp -q", quoted(ctx.source), quoted(ctx.dest));
    ctx.run(&ctx.tools.jlecmd, &arguments, &ctx.log_file(), None)
}

/// Recycle bin
pub fn rbcmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let arguments = format!("-d {} --csv {} -q", quoted(ctx.source), quoted(ctx.dest));
    ctx.run(&ctx.tools.rbcmd, &arguments, &ctx.log_file(), None)
}

/// Shellbags
pub fn sbecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let arguments = format!("-d {} --csv {}", quoted(ctx.source), quoted(ctx.dest));
    ctx.run(&ctx.tools.sbecmd, &arguments, &ctx.log_file(), None)
}

/// Windows 10 timeline
pub fn wxtcmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(database) = find_file_named(ctx.source, "ActivitiesCache.db") else {
        return ModuleResult::missing_artifact();
    };
    let arguments = format!("-f {} --csv {}", quoted(&database), quoted(ctx.dest));
    ctx.run(&ctx.tools.wxtcmd, &arguments, &ctx.log_file(), None)
}

pub fn recent_file_cache_parser(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(cache) = find_file_named(ctx.source, "RecentFileCache.bcf") else {
        return ModuleResult::missing_artifact();
    };
    let arguments = format!("-f {} --csv {}", quoted(&cache), quoted(ctx.dest));
    ctx.run(&ctx.tools.recent_file_cache_parser, &arguments, &ctx.log_file(), None)
}
