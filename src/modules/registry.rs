//! Registry hive parsing through RECmd batch files.

use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const RECMD: &str = "module_RECmd";
pub const RECMD_ASEP: &str = "module_RECmd_ASEP";

fn run_batch(ctx: &ModuleContext<'_>, batch_file: &str, log_suffix: &str) -> ModuleResult {
    let batch = ctx
        .tools
        .eztool_dir
        .join("RECmd")
        .join("BatchExamples")
        .join(batch_file);
    let arguments = format!(
        "-d {} --bn {} --nl false --csv {}",
        quoted(ctx.source),
        quoted(&batch),
        quoted(ctx.dest)
    );
    let log_file = ctx.log_file_in(ctx.dest, log_suffix);
    ctx.run(&ctx.tools.recmd, &arguments, &log_file, None)
}

pub fn recmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    run_batch(ctx, "DFIRBatch.reb", "_dfir_batch.txt")
}

/// Autostart extensibility points only
pub fn recmd_asep(ctx: &ModuleContext<'_>) -> ModuleResult {
    run_batch(ctx, "RegistryASEPs.reb", "_reg_asep.txt")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::ProcessRunner;
    use crate::test_utils::echo_tools;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_batch_files_and_logs() {
        let case = TempDir::new().unwrap();
        let tools = echo_tools();
        let runner = ProcessRunner::default();

        let dfir = ModuleContext {
            source: case.path(),
            dest: case.path(),
            identifier: RECMD,
            tools: &tools,
            runner: &runner,
        };
        recmd(&dfir);

        let asep = ModuleContext {
            identifier: RECMD_ASEP,
            ..dfir
        };
        recmd_asep(&asep);

        let dfir_log = fs::read_to_string(case.path().join("output_module_RECmd_dfir_batch.txt")).unwrap();
        let asep_log = fs::read_to_string(case.path().join("output_module_RECmd_ASEP_reg_asep.txt")).unwrap();
        assert!(dfir_log.contains("RECmd/BatchExamples/DFIRBatch.reb --nl false"));
        assert!(asep_log.contains("RegistryASEPs.reb"));
    }
}
