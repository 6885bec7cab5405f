//! Run report and end-of-run summary.

use crate::pipeline::RunState;
use crate::utils::MessageSink;
use crate::{DispatchOutcome, DispatchStatus, RunDirectory};

/// What a run produced: terminal state, run directory (if one was reached) and every dispatch outcome.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub state: RunState,
    pub run_dir: Option<RunDirectory>,
    pub outcomes: Vec<DispatchOutcome>,
    /// Message of the fatal condition when `state` is `Aborted`.
    pub fatal: Option<String>,
    /// `settings.enter_confirmation` of the loaded configuration.
    pub enter_confirmation: bool,
}

impl RunReport {
    /// Process exit code: 0 on completion (including "nothing to do"), 1 on abort.
    pub fn exit_code(&self) -> i32 {
        match self.state {
            RunState::Completed => 0,
            _ => 1,
        }
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut c = OutcomeCounts::default();
        for o in &self.outcomes {
            match o.status {
                DispatchStatus::Success => c.success += 1,
                DispatchStatus::SkippedDisabled => c.skipped_disabled += 1,
                DispatchStatus::SkippedMissingFolder => c.skipped_missing_folder += 1,
                DispatchStatus::Failed(_) => c.failed += 1,
            }
        }
        c
    }

    /// Outcomes recorded for `module`, in dispatch order.
    pub fn outcomes_for<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a DispatchOutcome> {
        self.outcomes.iter().filter(move |o| o.module == module)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub success: usize,
    pub skipped_disabled: usize,
    pub skipped_missing_folder: usize,
    pub failed: usize,
}

/// Write the outcome summary to the sink.
pub fn summarize(counts: &OutcomeCounts, sink: &mut dyn MessageSink) {
    sink.info(&format!(
        "Success: {} | Disabled: {} | Missing folder: {} | Failed: {}",
        counts.success, counts.skipped_disabled, counts.skipped_missing_folder, counts.failed
    ));
}
