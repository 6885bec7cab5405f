//! Stagerun: batch image pipeline orchestration.
//!
//! One invocation creates a dated run directory (`YYMMDD` or `YYMMDD_NN`), provisions the
//! numbered stage folders (`01-<ext>`, `02-<format>`, `03-<semanticName>`) and dispatches the
//! configured processing modules onto their target folders.

pub mod engine;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod registry;
pub mod run_dir;
pub mod settings;
pub mod stages;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{Error, ProcessingError};
pub use pipeline::{PipelineRunner, RunReport, RunState};
pub use registry::{Handler, ModuleRegistry};
pub use settings::Settings;
pub use utils::{MessageSink, RunLog};

use log::debug;
use std::path::Path;

/// Single entry point: run one batch rooted at `base_dir`.
///
/// - `registry` supplies handlers (static registrations plus on-disk discovery). The built-in
///   `prepareInput` sort module is added automatically when an entrance path is configured and
///   no handler of that name is registered.
/// - `sink` receives every decision. Use [`RunLog`] for console + run-directory log files.
///
/// Never panics on configuration or filesystem problems: fatal conditions end in
/// [`RunState::Aborted`] with `report.fatal` set.
///
/// ```ignore
/// let mut sink = stagerun::RunLog::new();
/// let registry = stagerun::ModuleRegistry::with_default_locations(dir);
/// let report = stagerun::run_batch(dir, &stagerun::Opts::default(), registry, &mut sink);
/// std::process::exit(report.exit_code());
/// ```
pub fn run_batch(
    base_dir: &Path,
    opts: &Opts,
    registry: ModuleRegistry,
    sink: &mut dyn MessageSink,
) -> RunReport {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let mut runner = PipelineRunner::new(base_dir, opts, registry);
    runner.run(sink)
}
