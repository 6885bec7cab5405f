//! Per-module dispatch: resolve targets, resolve the handler, invoke it once per target.
//! Every module/target pair yields exactly one [`DispatchOutcome`].

use std::path::PathBuf;

use crate::registry::ModuleRegistry;
use crate::stages::collation_path;
use crate::utils::MessageSink;
use crate::{
    DispatchFailure, DispatchOutcome, DispatchStatus, FolderKeyMapping, ModuleConfig, RunDirectory,
};

/// What to do after a failed dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    #[default]
    Continue,
    /// Stop at the first failure; the run aborts.
    Abort,
}

/// A resolved target folder and the key it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub key: Option<String>,
    pub folder: PathBuf,
}

fn outcome(
    module: &str,
    key: Option<&str>,
    folder: Option<PathBuf>,
    status: DispatchStatus,
) -> DispatchOutcome {
    DispatchOutcome {
        module: module.to_string(),
        key: key.map(str::to_string),
        target_folder: folder,
        status,
    }
}

/// Resolve a module's target keys to existing collation folders.
/// Unmapped keys and missing folders become `SkippedMissingFolder` outcomes; the rest are targets.
/// A module without target keys targets the run directory itself.
pub fn resolve_targets(
    module: &ModuleConfig,
    run: &RunDirectory,
    mapping: &FolderKeyMapping,
    sink: &mut dyn MessageSink,
) -> (Vec<Target>, Vec<DispatchOutcome>) {
    let Some(keys) = &module.target_folder_keys else {
        return (
            vec![Target {
                key: None,
                folder: run.path(),
            }],
            Vec::new(),
        );
    };

    let mut targets = Vec::new();
    let mut skipped = Vec::new();
    for key in keys {
        let Some(name) = mapping.get(key) else {
            sink.warn(&format!(
                "Module '{}': key '{}' has no folder mapping, skipping",
                module.name, key
            ));
            skipped.push(outcome(
                &module.name,
                Some(key),
                None,
                DispatchStatus::SkippedMissingFolder,
            ));
            continue;
        };
        let folder = collation_path(run, name);
        if !folder.is_dir() {
            sink.warn(&format!(
                "Module '{}': folder {} does not exist, skipping",
                module.name,
                folder.display()
            ));
            skipped.push(outcome(
                &module.name,
                Some(key),
                Some(folder),
                DispatchStatus::SkippedMissingFolder,
            ));
            continue;
        }
        targets.push(Target {
            key: Some(key.clone()),
            folder,
        });
    }
    (targets, skipped)
}

/// Dispatch one configured module. Never fails: every problem is recorded as an outcome.
/// With [`FailurePolicy::Abort`], stops after the first failing target.
pub fn dispatch_module(
    module: &ModuleConfig,
    run: &RunDirectory,
    mapping: &FolderKeyMapping,
    registry: &ModuleRegistry,
    policy: FailurePolicy,
    sink: &mut dyn MessageSink,
) -> Vec<DispatchOutcome> {
    if !module.enabled {
        sink.info(&format!("Module '{}' is disabled, skipping", module.name));
        return vec![outcome(&module.name, None, None, DispatchStatus::SkippedDisabled)];
    }

    let (targets, mut outcomes) = resolve_targets(module, run, mapping, sink);
    if targets.is_empty() {
        sink.warn(&format!(
            "Module '{}' has no resolvable target folders, skipping",
            module.name
        ));
        return outcomes;
    }

    let handler = match registry.resolve(&module.name) {
        Ok(h) => h,
        Err(e) => {
            sink.error(&format!("{}; searched {:?}", e, registry.search_locations()));
            outcomes.extend(targets.into_iter().map(|t| {
                outcome(
                    &module.name,
                    t.key.as_deref(),
                    Some(t.folder),
                    DispatchStatus::Failed(DispatchFailure::ModuleNotFound),
                )
            }));
            return outcomes;
        }
    };

    for target in targets {
        sink.info(&format!("[RUN] {} -> {}", module.name, target.folder.display()));
        let status = match handler.process_folder(&target.folder) {
            Ok(()) => {
                sink.info(&format!(
                    "Module '{}' finished on {}",
                    module.name,
                    target.folder.display()
                ));
                DispatchStatus::Success
            }
            Err(e) => {
                sink.error(&format!(
                    "Module '{}' failed on {}: {}",
                    module.name,
                    target.folder.display(),
                    e
                ));
                DispatchStatus::Failed(DispatchFailure::Processing(e.reason))
            }
        };
        let failed = status.is_failed();
        outcomes.push(outcome(
            &module.name,
            target.key.as_deref(),
            Some(target.folder),
            status,
        ));
        if failed && policy == FailurePolicy::Abort {
            break;
        }
    }
    outcomes
}
