use std::process;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use windows_parser::cli::Args;
use windows_parser::config::{load_or_default, Platform, TargetPatterns};
use windows_parser::constants::timestamp;
use windows_parser::discovery::EvidenceRootDiscoverer;
use windows_parser::dispatcher::RootDispatcher;
use windows_parser::error::ParserError;
use windows_parser::models::EvidenceRoot;
use windows_parser::modules::{ModuleCatalog, ModuleRegistry};
use windows_parser::runner::ProcessRunner;
use windows_parser::scheduler::{ExecutionPlan, ModuleScheduler};
use windows_parser::utils::summary::{create_run_summary, report_failures, write_run_summary};

fn main() {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = initialize_logging(args.verbose) {
        eprintln!("{:#}", e);
    }

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        process::exit(-1);
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let started = Local::now();
    let platform = Platform::current();

    let config = load_or_default(args.config.as_deref())?;
    let tools = config.tool_config(platform);
    let runner = ProcessRunner::default();
    let registry = ModuleRegistry::builtin();
    debug!("Available parsers: {}", registry.identifiers().join(", "));

    // Module selection is validated before any target is touched
    let catalog;
    let plan = match &args.module {
        Some(name) => {
            info!("using single_module: {}", name);
            ExecutionPlan::Single(registry.lookup(name)?)
        }
        None => {
            catalog = ModuleCatalog::build(&config.modules, platform)?;
            catalog.log_active();
            ExecutionPlan::Catalog(&catalog)
        }
    };

    let cap = args.max_module_concurrency.or(config.max_module_concurrency);
    let scheduler = ModuleScheduler::new(&tools, &runner).with_max_concurrency(cap);
    let dispatcher = RootDispatcher::new(scheduler);

    let reports = if let Some(target) = &args.multiple {
        info!("Parsing multiple target folders under {}", target.display());
        if !target.exists() {
            return Err(ParserError::TargetNotFound(target.clone()).into());
        }
        let patterns = TargetPatterns::load(args.patterns.as_deref())?;
        let roots = EvidenceRootDiscoverer::new(&patterns).discover(target)?;
        dispatcher.dispatch(roots, plan)?
    } else if let Some(target) = &args.single {
        info!("Parsing single target folder {}", target.display());
        if !target.exists() {
            return Err(ParserError::TargetNotFound(target.clone()).into());
        }
        let full_path = dunce::canonicalize(target)
            .context(format!("Failed to resolve {}", target.display()))?;
        vec![dispatcher.process_root(&EvidenceRoot::from_path(full_path), plan)?]
    } else {
        return Err(anyhow!("One of -s or -r is required"));
    };

    report_failures(&reports);

    if let Some(path) = &args.summary {
        let summary = create_run_summary(started, Local::now(), platform, &reports)?;
        write_run_summary(path, &summary)?;
    }

    info!("{}: Done...", timestamp());
    Ok(())
}
