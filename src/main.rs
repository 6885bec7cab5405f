//! Stagerun CLI: one batch per invocation; exit 0 on completion, 1 on any fatal condition.

use clap::Parser;
use stagerun::engine::arg_parser::Cli;
use stagerun::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = match handle_run(&cli) {
        Ok(report) => report.exit_code(),
        Err(e) => {
            eprintln!("stagerun: {e:#}");
            1
        }
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::from(code as u8)
}
