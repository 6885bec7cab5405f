//! Pipeline runner: drives one batch through load → provision → dispatch.
//!
//! Fatal conditions (missing or malformed config, no modules, no run directory) move the run to
//! `Aborted` immediately. Everything else is recorded and the run keeps going, unless the
//! strict failure policy is set, in which case the first failed dispatch aborts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use log::debug;

use crate::error::{Error, Result};
use crate::intake::{SortInputHandler, scan_input_extensions};
use crate::pipeline::dispatch::{FailurePolicy, dispatch_module};
use crate::pipeline::report::{RunReport, summarize};
use crate::pipeline::state::RunState;
use crate::registry::ModuleRegistry;
use crate::run_dir::{create_or_find_run_directory, find_latest_run_directory};
use crate::settings::Settings;
use crate::stages::{
    ProvisionReport, Stage2Resolution, provision_all_mapped, provision_sort_stages,
    provision_stage, resolve_stage2,
};
use crate::utils::MessageSink;
use crate::utils::config::{PREPARE_INPUT_MODULE, SettingsFiles};
use crate::{DispatchOutcome, Opts, RunDirectory, Stage};

pub struct PipelineRunner {
    base_dir: PathBuf,
    opts: Opts,
    registry: ModuleRegistry,
    state: RunState,
}

impl PipelineRunner {
    pub fn new(base_dir: &Path, opts: &Opts, registry: ModuleRegistry) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            opts: opts.clone(),
            registry,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!("state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn settings_dir(&self) -> PathBuf {
        self.opts
            .settings_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join(SettingsFiles::DIR))
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.opts.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        }
    }

    fn abort(
        &mut self,
        message: String,
        run_dir: Option<RunDirectory>,
        outcomes: Vec<DispatchOutcome>,
        sink: &mut dyn MessageSink,
    ) -> RunReport {
        sink.error(&format!("[FATAL] {message}"));
        self.transition(RunState::Aborted);
        RunReport {
            state: self.state,
            run_dir,
            outcomes,
            fatal: Some(message),
            enter_confirmation: false,
        }
    }

    /// Run the whole batch. Always returns a report; check `state` or `exit_code()`.
    /// A runner runs once: calling `run` again reports `Aborted` and touches nothing.
    pub fn run(&mut self, sink: &mut dyn MessageSink) -> RunReport {
        if self.state != RunState::Idle {
            let message = format!("runner already used (state: {})", self.state);
            sink.error(&format!("[FATAL] {message}"));
            return RunReport {
                state: RunState::Aborted,
                run_dir: None,
                outcomes: Vec::new(),
                fatal: Some(message),
                enter_confirmation: false,
            };
        }
        self.transition(RunState::Loading);
        let settings = match self.load(sink) {
            Ok(s) => s,
            Err(e) => return self.abort(e.to_string(), None, Vec::new(), sink),
        };

        self.transition(RunState::Provisioning);
        let run = match self.provision(&settings, sink) {
            Ok(r) => r,
            Err(e) => return self.abort(e.to_string(), None, Vec::new(), sink),
        };

        self.transition(RunState::Dispatching);
        sink.info("Starting module processing");
        let policy = self.failure_policy();
        let mut outcomes = Vec::new();
        for module in settings.module_list() {
            let module_outcomes = dispatch_module(
                module,
                &run,
                settings.folder_mapping(),
                &self.registry,
                policy,
                sink,
            );
            let failed = module_outcomes.iter().find(|o| o.status.is_failed()).cloned();
            outcomes.extend(module_outcomes);
            if policy == FailurePolicy::Abort
                && let Some(f) = failed
            {
                let message = format!(
                    "strict mode: module '{}' failed{}",
                    f.module,
                    f.target_folder
                        .map(|p| format!(" on {}", p.display()))
                        .unwrap_or_default()
                );
                return self.abort(message, Some(run), outcomes, sink);
            }
        }

        let report = RunReport {
            state: RunState::Completed,
            run_dir: Some(run),
            outcomes,
            fatal: None,
            enter_confirmation: settings.enter_confirmation(),
        };
        summarize(&report.counts(), sink);
        sink.info("All configured modules attempted");
        self.transition(RunState::Completed);
        report
    }

    fn load(&mut self, sink: &mut dyn MessageSink) -> Result<Settings> {
        let dir = self.settings_dir();
        sink.info(&format!("Loading settings from {}", dir.display()));
        let settings = Settings::load(&dir)?;
        sink.configure(settings.logger());
        for note in settings.notes() {
            sink.warn(note);
        }
        if settings.module_list().is_empty() {
            return Err(Error::NoModules);
        }
        debug!(
            "settings from {}, output format: {}",
            settings.settings_dir().display(),
            settings.output_format()
        );
        Ok(settings)
    }

    fn provision(&mut self, settings: &Settings, sink: &mut dyn MessageSink) -> Result<RunDirectory> {
        let root = settings.run_root(&self.base_dir);
        let run = if self.opts.reuse_latest {
            let run = find_latest_run_directory(&root)?;
            sink.info(&format!("Reusing latest run directory: {run}"));
            run
        } else {
            let today = self.opts.today.unwrap_or_else(|| Local::now().date_naive());
            let run = create_or_find_run_directory(&root, today)?;
            sink.info(&format!("Run directory created: {run}"));
            run
        };
        if let Err(e) = sink.attach(&run.path()) {
            sink.warn(&format!("Cannot open run log in {run}: {e}"));
        }

        if let Some(entrance) = settings.entrance_path(&self.base_dir) {
            self.provision_sort(&run, &entrance, &root, sink);
        } else {
            debug!("no entrance path configured; sort stage not provisioned");
        }

        let format = settings.output_format();
        match resolve_stage2(&run, format) {
            Some(Stage2Resolution::Exact(p)) => debug!("convert stage: {}", p.display()),
            Some(Stage2Resolution::Fallback(p)) => sink.info(&format!(
                "Preferred folder {} not found, using {}",
                Stage::Convert.folder_name(format),
                p.display()
            )),
            None => match provision_stage(&run, Stage::Convert, format) {
                Ok(p) => sink.info(&format!("Output folder created: {}", p.display())),
                Err(e) => sink.error(&e.to_string()),
            },
        }

        let mapped = provision_all_mapped(&run, settings.folder_mapping());
        log_provision(&mapped, "Collation folder", sink);
        Ok(run)
    }

    /// Provision `01-<ext>` folders for the inputs and register the built-in sort module.
    fn provision_sort(
        &mut self,
        run: &RunDirectory,
        entrance: &Path,
        root: &Path,
        sink: &mut dyn MessageSink,
    ) {
        if !entrance.is_dir() {
            sink.warn(&format!(
                "Entrance path {} does not exist; sort stage not provisioned",
                entrance.display()
            ));
            return;
        }
        let extensions = scan_input_extensions(entrance, Some(root));
        let sorted = provision_sort_stages(run, &extensions);
        log_provision(&sorted, "Sort folder", sink);
        if !self.registry.is_registered(PREPARE_INPUT_MODULE) {
            self.registry.register(
                PREPARE_INPUT_MODULE,
                Arc::new(SortInputHandler::new(
                    entrance.to_path_buf(),
                    Some(root.to_path_buf()),
                )),
            );
        }
    }
}

fn log_provision(report: &ProvisionReport, what: &str, sink: &mut dyn MessageSink) {
    for p in &report.provisioned {
        sink.info(&format!("{what} ready: {}", p.display()));
    }
    for (name, e) in &report.failed {
        sink.error(&format!("{what} {name} not provisioned: {e}"));
    }
}
