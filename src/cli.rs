use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Command-line arguments for windows-parser.
///
/// Exactly one of `-s` and `-r` selects what to parse. Everything else is
/// optional.
#[derive(Parser, Debug)]
#[clap(
    name = "windows-parser",
    version,
    about = "Run forensic parsers over Windows triage collections"
)]
#[clap(group(ArgGroup::new("target").required(true).args(["single", "multiple"])))]
pub struct Args {
    /// Parse one evidence root directly
    #[clap(short = 's', value_name = "SINGLE_TARGET_FOLDER")]
    pub single: Option<PathBuf>,

    /// Search a case directory for evidence roots and parse each of them
    #[clap(short = 'r', value_name = "MULTIPLE_TARGET_FOLDERS")]
    pub multiple: Option<PathBuf>,

    /// Pattern file, one regex per line (default: bundled target.txt)
    #[clap(short = 'f', value_name = "TARGET_FILE_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Run only this module, e.g. module_RBCmd
    #[clap(short = 'm', value_name = "SINGLE_PARSER")]
    pub module: Option<String>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Maximum modules running at once per evidence root (0 = unlimited)
    #[clap(long)]
    pub max_module_concurrency: Option<usize>,

    /// Write a JSON run summary to this path
    #[clap(long)]
    pub summary: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}
