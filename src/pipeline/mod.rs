//! Pipeline components: run state, per-module dispatch, runner, report.

pub mod dispatch;
pub mod report;
pub mod runner;
pub mod state;

pub use dispatch::{FailurePolicy, Target, dispatch_module, resolve_targets};
pub use report::{OutcomeCounts, RunReport, summarize};
pub use runner::PipelineRunner;
pub use state::RunState;
