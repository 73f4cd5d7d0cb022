use super::artifacts::find_last_file_ending_with;
use super::{quoted, ModuleContext};
use crate::models::ModuleResult;

pub const MFTECMD: &str = "module_MFTECmd";

/// Parse `$MFT`, together with the `$J` change journal when one was collected.
///
/// Collections holding several copies use the last one in walk order.
pub fn mftecmd(ctx: &ModuleContext<'_>) -> ModuleResult {
    let Some(mft) = find_last_file_ending_with(ctx.source, "$MFT") else {
        return ModuleResult::missing_artifact();
    };

    let arguments = match find_last_file_ending_with(ctx.source, "$J") {
        Some(journal) => format!(
            "-f {} -m {} --csv {}",
            quoted(&journal),
            quoted(&mft),
            quoted(ctx.dest)
        ),
        None => format!("-f {} --csv {}", quoted(&mft), quoted(ctx.dest)),
    };

    let log_file = ctx.log_file_in(ctx.dest, "_mft_j.txt");
    ctx.run(&ctx.tools.mftecmd, &arguments, &log_file, None)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus;
    use crate::runner::ProcessRunner;
    use crate::test_utils::echo_tools;
    use std::fs;
    use tempfile::TempDir;

    fn run_in(root: &std::path::Path) -> ModuleResult {
        let tools = echo_tools();
        let runner = ProcessRunner::default();
        let ctx = ModuleContext {
            source: root,
            dest: root,
            identifier: MFTECMD,
            tools: &tools,
            runner: &runner,
        };
        mftecmd(&ctx)
    }

    #[test]
    fn test_mft_with_journal() {
        let case = TempDir::new().unwrap();
        fs::create_dir_all(case.path().join("C/$Extend")).unwrap();
        fs::write(case.path().join("C/$MFT"), b"FILE0").unwrap();
        fs::write(case.path().join("C/$Extend/$J"), b"").unwrap();

        let result = run_in(case.path());

        assert_eq!(result.status, ExecutionStatus::Success);
        let log = fs::read_to_string(case.path().join("output_module_MFTECmd_mft_j.txt")).unwrap();
        assert!(log.contains("$J -m "));
        assert!(log.contains("$MFT --csv"));
    }

    #[test]
    fn test_mft_only() {
        let case = TempDir::new().unwrap();
        fs::write(case.path().join("$MFT"), b"FILE0").unwrap();

        run_in(case.path());

        let log = fs::read_to_string(case.path().join("output_module_MFTECmd_mft_j.txt")).unwrap();
        assert!(!log.contains(" -m "));
    }

    #[test]
    fn test_last_mft_wins() {
        let case = TempDir::new().unwrap();
        fs::create_dir_all(case.path().join("C")).unwrap();
        fs::create_dir_all(case.path().join("D")).unwrap();
        fs::write(case.path().join("C/$MFT"), b"FILE0").unwrap();
        fs::write(case.path().join("D/$MFT"), b"FILE0").unwrap();

        run_in(case.path());

        let log = fs::read_to_string(case.path().join("output_module_MFTECmd_mft_j.txt")).unwrap();
        assert!(log.contains("D/$MFT --csv"));
        assert!(!log.contains("C/$MFT"));
    }

    #[test]
    fn test_journal_without_mft_is_missing() {
        let case = TempDir::new().unwrap();
        fs::write(case.path().join("$J"), b"").unwrap();

        let result = run_in(case.path());

        assert_eq!(result, ModuleResult::missing_artifact());
        let logs = fs::read_dir(case.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("output_"))
            .count();
        assert_eq!(logs, 0);
    }
}
