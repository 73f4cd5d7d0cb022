use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const SQLECMD: &str = "module_SQLECmd";

/// SQLite databases (browser history and friends), located by SQLECmd's own maps
pub fn sqlecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let arguments = format!("-d {} --csv {}", quoted(ctx.source), quoted(ctx.dest));
    ctx.run(&ctx.tools.sqlecmd, &arguments, &ctx.log_file(), None)
}
