//! CLI command handler: merge `.stagerun.toml` and flags into Opts, run the batch, report.

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;

use crate::engine::arg_parser::Cli;
use crate::pipeline::{RunReport, RunState};
use crate::registry::ModuleRegistry;
use crate::utils::stagerun_toml::{apply_file_to_opts, load_stagerun_toml};
use crate::utils::{Colors, RunLog, setup_logging};
use crate::{Opts, run_batch};

/// Canonical working directory and merged options (file first, CLI flags override).
fn setup_opts(cli: &Cli) -> Result<(PathBuf, Opts)> {
    let dir = cli
        .dir
        .canonicalize()
        .with_context(|| format!("working directory {}", cli.dir.display()))?;
    let mut opts = Opts::default();
    if let Some(file) = load_stagerun_toml(&dir)? {
        apply_file_to_opts(&file, &dir, &mut opts);
    }
    if let Some(ref s) = cli.settings {
        opts.settings_dir = Some(dir.join(s));
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.strict {
        opts.strict = v;
    }
    if let Some(v) = cli.latest {
        opts.reuse_latest = v;
    }
    opts.today = cli.date;
    setup_logging(opts.verbose);
    Ok((dir, opts))
}

/// Run one batch. Returns the report; the caller maps it to an exit code.
pub fn handle_run(cli: &Cli) -> Result<RunReport> {
    let (dir, opts) = setup_opts(cli)?;
    debug!("working directory: {}", dir.display());
    if opts.strict {
        log::warn!("STRICT MODE: THE FIRST FAILED MODULE ABORTS THE RUN.");
    }

    let registry = ModuleRegistry::with_default_locations(&dir);
    let mut sink = RunLog::new();
    let report = run_batch(&dir, &opts, registry, &mut sink);

    match report.state {
        RunState::Completed => {
            let run = report
                .run_dir
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_default();
            let c = report.counts();
            info!(
                "{} {} | {} {} | {} {}",
                Colors::colorize(Colors::SUCCESS, "success"),
                c.success,
                Colors::colorize(Colors::SKIPPED, "skipped"),
                c.skipped_disabled + c.skipped_missing_folder,
                Colors::colorize(Colors::FAILED, "failed"),
                c.failed
            );
            info!("{} {}", Colors::colorize(Colors::SUCCESS, "Run completed:"), run);
            if report.enter_confirmation && std::io::stdin().is_terminal() {
                wait_for_enter();
            }
        }
        _ => error!(
            "{} {}",
            Colors::colorize(Colors::FAILED, "RUN ABORTED:"),
            report.fatal.as_deref().unwrap_or("unknown error")
        ),
    }
    Ok(report)
}

fn wait_for_enter() {
    println!("Press Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
