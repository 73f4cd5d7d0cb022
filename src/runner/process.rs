use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};

use crate::constants::{FAILED_LOG_SUFFIX, LOG_SUFFIX};
use crate::models::{ExecutionStatus, ModuleResult};

/// Combined stdout/stderr of a finished tool.
struct CapturedRun {
    success: bool,
    output: String,
}

/// Runs one external tool and turns its exit status into a log artifact.
///
/// Never returns an error: a tool that exits nonzero or cannot be started
/// leaves a `_failed.txt` log behind and the caller carries on.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    default_working_dir: PathBuf,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(env::temp_dir())
    }
}

impl ProcessRunner {
    /// Create a runner whose tools start in `default_working_dir` unless a
    /// module asks for another directory
    pub fn new(default_working_dir: PathBuf) -> Self {
        ProcessRunner {
            default_working_dir,
        }
    }

    pub fn default_working_dir(&self) -> &Path {
        &self.default_working_dir
    }

    /// Run `binary` with a shell-style `arguments` string.
    ///
    /// * log file already present: nothing is launched, `Skipped`
    /// * exit 0: captured output written to `log_file`, `Success`
    /// * anything else: header plus output written to the `_failed` sibling, `Failed`
    pub fn run(
        &self,
        binary: &str,
        arguments: &str,
        log_file: &Path,
        working_dir: Option<&Path>,
    ) -> ModuleResult {
        if log_file.exists() {
            debug!("Skipping {}, log exists: {}", binary, log_file.display());
            return ModuleResult::with_log(ExecutionStatus::Skipped, log_file.to_path_buf());
        }

        let working_dir = working_dir.unwrap_or(&self.default_working_dir);
        let display_path = quote_if_spaced(binary);
        debug!("Running {} {} in {}", display_path, arguments, working_dir.display());

        let captured = match execute(binary, arguments, working_dir) {
            Ok(captured) => captured,
            Err(e) => CapturedRun {
                success: false,
                output: format!("{:#}\n", e),
            },
        };

        if captured.success {
            if let Err(e) = write_log(log_file, &captured.output) {
                warn!("{:#}", e);
                return ModuleResult::with_log(ExecutionStatus::Failed, log_file.to_path_buf());
            }
            return ModuleResult::with_log(ExecutionStatus::Success, log_file.to_path_buf());
        }

        let failed_log = failed_log_path(log_file);
        let content = format!(
            "Run '{} {}' failed!\r\n{}",
            display_path, arguments, captured.output
        );
        if let Err(e) = write_log(&failed_log, &content) {
            warn!("{:#}", e);
        }
        warn!("Run '{} {}' failed, see {}", display_path, arguments, failed_log.display());
        ModuleResult::with_log(ExecutionStatus::Failed, failed_log)
    }
}

/// Launch the tool with stdout and stderr sharing one pipe and block until it exits
fn execute(binary: &str, arguments: &str, working_dir: &Path) -> Result<CapturedRun> {
    let argv = build_argv(binary, arguments)?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("Empty command line for '{}'", binary))?;

    let (mut reader, writer) = std::io::pipe().context("Failed to create output pipe")?;

    let mut child = {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone().context("Failed to clone output pipe")?)
            .stderr(writer);
        command
            .spawn()
            .context(format!("Failed to launch {}", program))?
        // `command` drops here, releasing our copies of the write end
    };

    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context(format!("Failed to read output of {}", program))?;
    let status = child
        .wait()
        .context(format!("Failed to wait for {}", program))?;

    Ok(CapturedRun {
        success: status.success(),
        output: String::from_utf8_lossy(&raw).into_owned(),
    })
}

/// Split the argument string with POSIX shell rules.
///
/// A binary entry that contains whitespace and is not an existing file is an
/// interpreter line (`python3 'prefetchruncounts.py'`) and is split as well.
fn build_argv(binary: &str, arguments: &str) -> Result<Vec<String>> {
    let mut argv = if binary.contains(char::is_whitespace) && !Path::new(binary).exists() {
        shlex::split(binary).ok_or_else(|| anyhow!("Unbalanced quoting in tool path: {}", binary))?
    } else {
        vec![binary.to_string()]
    };

    let args = shlex::split(arguments)
        .ok_or_else(|| anyhow!("Unbalanced quoting in arguments: {}", arguments))?;
    argv.extend(args);
    Ok(argv)
}

fn write_log(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).context(format!("Failed to write log {}", path.display()))
}

/// Quote a tool path containing spaces, as it appears in failure headers
pub fn quote_if_spaced(binary: &str) -> String {
    if binary.contains(' ') {
        format!("\"{}\"", binary)
    } else {
        binary.to_string()
    }
}

/// `output_x.txt` becomes `output_x_failed.txt`.
///
/// Logs with another extension get `_failed` before it (`output_x_failed.csv`).
pub fn failed_log_path(log_file: &Path) -> PathBuf {
    let name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let failed_name = match name.strip_suffix(LOG_SUFFIX) {
        Some(stem) => format!("{}{}", stem, FAILED_LOG_SUFFIX),
        None => match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{}_failed.{}", stem, ext),
            None => format!("{}_failed", name),
        },
    };

    log_file.with_file_name(failed_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_failed_log_path() {
        assert_eq!(
            failed_log_path(Path::new("/out/output_module_RBCmd.txt")),
            PathBuf::from("/out/output_module_RBCmd_failed.txt")
        );
        assert_eq!(
            failed_log_path(Path::new("/out/output_module_prefetchruncounts.csv")),
            PathBuf::from("/out/output_module_prefetchruncounts_failed.csv")
        );
        assert_eq!(
            failed_log_path(Path::new("/out/output")),
            PathBuf::from("/out/output_failed")
        );
    }

    #[test]
    fn test_failed_log_path_only_touches_suffix() {
        // A ".txt" inside a directory name must survive
        assert_eq!(
            failed_log_path(Path::new("/case.txt/output_a.txt")),
            PathBuf::from("/case.txt/output_a_failed.txt")
        );
    }

    #[test]
    fn test_quote_if_spaced() {
        assert_eq!(quote_if_spaced("RBCmd"), "RBCmd");
        assert_eq!(
            quote_if_spaced(r"C:\Program Files\RBCmd.exe"),
            r#""C:\Program Files\RBCmd.exe""#
        );
    }

    #[test]
    fn test_build_argv_keeps_quoted_tokens() {
        let argv = build_argv("MFTECmd", r#"-f "/case/a b/$MFT" --csv "/out dir""#).unwrap();
        assert_eq!(argv, vec!["MFTECmd", "-f", "/case/a b/$MFT", "--csv", "/out dir"]);
    }

    #[test]
    fn test_build_argv_keeps_windows_paths() {
        use crate::modules::quoted;

        let root = Path::new(r"\\?\D:\case\HOST_triage");
        let dest = Path::new(r"D:\case\HOST_triage\WindowsParser\file");
        let arguments = format!("-d {} --csv {} -q", quoted(root), quoted(dest));

        let argv = build_argv(r"C:\Tools\RBCmd.exe", &arguments).unwrap();
        assert_eq!(
            argv,
            vec![
                r"C:\Tools\RBCmd.exe",
                "-d",
                r"\\?\D:\case\HOST_triage",
                "--csv",
                r"D:\case\HOST_triage\WindowsParser\file",
                "-q",
            ]
        );
    }

    #[test]
    fn test_build_argv_interpreter_line() {
        let argv = build_argv("python3 '/opt/tools/prefetchruncounts.py'", r#""/case/Prefetch""#).unwrap();
        assert_eq!(
            argv,
            vec!["python3", "/opt/tools/prefetchruncounts.py", "/case/Prefetch"]
        );
    }

    #[test]
    fn test_build_argv_unbalanced_quotes() {
        assert!(build_argv("RBCmd", r#"-d "/case"#).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_success_writes_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_module_test.txt");

        let result = ProcessRunner::default().run("sh", r#"-c "echo hello""#, &log, None);

        assert_eq!(result.status, ExecutionStatus::Success);
        assert_eq!(result.log_path.as_deref(), Some(log.as_path()));
        assert_eq!(fs::read_to_string(&log).unwrap(), "hello\n");
        assert!(!temp_dir.path().join("output_module_test_failed.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_merged() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_merged.txt");

        ProcessRunner::default().run("sh", r#"-c "echo out; echo err >&2""#, &log, None);

        let content = fs::read_to_string(&log).unwrap();
        assert!(content.contains("out"));
        assert!(content.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_writes_failed_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_module_broken.txt");
        let args = r#"-c "echo boom; exit 3""#;

        let result = ProcessRunner::default().run("sh", args, &log, None);

        let failed = temp_dir.path().join("output_module_broken_failed.txt");
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.log_path.as_deref(), Some(failed.as_path()));
        assert!(!log.exists());

        let content = fs::read_to_string(&failed).unwrap();
        assert!(content.starts_with(&format!("Run 'sh {}' failed!\r\n", args)));
        assert!(content.contains("boom"));
    }

    #[test]
    fn test_launch_failure_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_missing_tool.txt");

        let result = ProcessRunner::default().run(
            "definitely-not-a-real-forensic-tool",
            "-q",
            &log,
            None,
        );

        assert_eq!(result.status, ExecutionStatus::Failed);
        let failed = temp_dir.path().join("output_missing_tool_failed.txt");
        let content = fs::read_to_string(failed).unwrap();
        assert!(content.contains("Failed to launch definitely-not-a-real-forensic-tool"));
    }

    #[test]
    fn test_existing_log_skips_run() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_done.txt");
        fs::write(&log, "previous run").unwrap();

        // Would fail loudly if it were launched
        let result = ProcessRunner::default().run("definitely-not-a-real-tool", "", &log, None);

        assert_eq!(result.status, ExecutionStatus::Skipped);
        assert_eq!(fs::read_to_string(&log).unwrap(), "previous run");
        assert!(!temp_dir.path().join("output_done_failed.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_log_does_not_block_rerun() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("output_flaky.txt");
        let runner = ProcessRunner::default();

        assert_eq!(runner.run("false", "", &log, None).status, ExecutionStatus::Failed);
        assert_eq!(runner.run("true", "", &log, None).status, ExecutionStatus::Success);
        assert!(log.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_working_directory() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let log = out.path().join("output_pwd.txt");

        ProcessRunner::default().run("pwd", "", &log, Some(work.path()));

        let printed = fs::read_to_string(&log).unwrap();
        let expected = work.path().canonicalize().unwrap();
        assert_eq!(Path::new(printed.trim()).canonicalize().unwrap(), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_default_working_directory() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let log = out.path().join("output_pwd.txt");

        let runner = ProcessRunner::new(work.path().to_path_buf());
        assert_eq!(runner.default_working_dir(), work.path());
        runner.run("pwd", "", &log, None);

        let printed = fs::read_to_string(&log).unwrap();
        assert_eq!(
            Path::new(printed.trim()).canonicalize().unwrap(),
            work.path().canonicalize().unwrap()
        );
    }
}
