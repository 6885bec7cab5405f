//! Stage folder provisioning inside a run directory. Additive and idempotent: folders are
//! created when absent, never deleted or renamed.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::utils::config::StageConsts;
use crate::{FolderKeyMapping, RunDirectory, Stage, StageFolder};

/// Create `run/<stageNumber>-<semanticName>` if absent; return its path either way.
pub fn provision_stage(run: &RunDirectory, stage: Stage, semantic_name: &str) -> Result<PathBuf> {
    let path = StageFolder::new(&run.path(), stage, semantic_name).path();
    if path.is_dir() {
        debug!("stage folder exists: {}", path.display());
        return Ok(path);
    }
    fs::create_dir_all(&path).map_err(|source| Error::DirectoryCreate {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// How the convert stage folder was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stage2Resolution {
    /// `02-<preferred>` exists.
    Exact(PathBuf),
    /// Preferred folder absent; another `02-*` folder was chosen.
    Fallback(PathBuf),
}

impl Stage2Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Stage2Resolution::Exact(p) | Stage2Resolution::Fallback(p) => p,
        }
    }
}

/// Find the convert stage folder: exact `02-<preferred_name>` first, else the
/// lexicographically smallest directory whose name starts with `02-`.
/// None when neither exists (caller may create the preferred folder).
pub fn resolve_stage2(run: &RunDirectory, preferred_name: &str) -> Option<Stage2Resolution> {
    let dir = run.path();
    let preferred = StageFolder::new(&dir, Stage::Convert, preferred_name).path();
    if preferred.is_dir() {
        return Some(Stage2Resolution::Exact(preferred));
    }
    let prefix = Stage::Convert.prefix();
    let mut candidates: Vec<String> = fs::read_dir(&dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|n| n.starts_with(&prefix))
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .map(|name| Stage2Resolution::Fallback(dir.join(name)))
}

/// Result of provisioning a set of folders: created-or-existing paths and per-folder failures.
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub provisioned: Vec<PathBuf>,
    pub failed: Vec<(String, Error)>,
}

impl ProvisionReport {
    fn push(&mut self, name: String, result: Result<PathBuf>) {
        match result {
            Ok(p) => self.provisioned.push(p),
            Err(e) => self.failed.push((name, e)),
        }
    }
}

/// Provision `03-<name>` for every mapping entry, whether or not any module targets it.
pub fn provision_all_mapped(run: &RunDirectory, mapping: &FolderKeyMapping) -> ProvisionReport {
    let mut report = ProvisionReport::default();
    for name in mapping.values() {
        report.push(
            Stage::Collation.folder_name(name),
            provision_stage(run, Stage::Collation, name),
        );
    }
    report
}

/// Provision `01-<ext>` for every input extension.
pub fn provision_sort_stages<'a, I>(run: &RunDirectory, extensions: I) -> ProvisionReport
where
    I: IntoIterator<Item = &'a String>,
{
    let mut report = ProvisionReport::default();
    for ext in extensions {
        report.push(
            Stage::Sort.folder_name(ext),
            provision_stage(run, Stage::Sort, ext),
        );
    }
    report
}

/// Collation folder path for a semantic name (no filesystem access).
pub fn collation_path(run: &RunDirectory, semantic_name: &str) -> PathBuf {
    StageFolder::new(&run.path(), Stage::Collation, semantic_name).path()
}

/// Scale-variant sub-folder name: `x<percent>`.
pub fn scale_variant_name(percent: u32) -> String {
    format!("{}{}", StageConsts::SCALE_PREFIX, percent)
}
