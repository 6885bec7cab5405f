//! Public and internal types for the stagerun API and pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::utils::config::StageConsts;

/// A date-stamped run directory: `<root>/<YYMMDD>` or `<root>/<YYMMDD>_<NN>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunDirectory {
    pub root: PathBuf,
    /// Date code, `YYMMDD`.
    pub date_code: String,
    /// Collision counter. `None` for the first run of the day.
    pub suffix: Option<u32>,
}

impl RunDirectory {
    /// Directory name, `YYMMDD` or `YYMMDD_NN` (NN zero-padded to 2 digits).
    pub fn name(&self) -> String {
        match self.suffix {
            None => self.date_code.clone(),
            Some(n) => format!("{}_{:02}", self.date_code, n),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(self.name())
    }
}

impl fmt::Display for RunDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Format a calendar date as a run directory date code (`YYMMDD`).
pub fn date_code(today: NaiveDate) -> String {
    today.format("%y%m%d").to_string()
}

/// Numbered pipeline stage. The number is the folder prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// `01-<ext>`: input images sorted by extension.
    Sort,
    /// `02-<format>`: images converted to the output format.
    Convert,
    /// `03-<semanticName>`: collation folders that processing modules work on.
    Collation,
}

impl Stage {
    pub fn number(self) -> &'static str {
        match self {
            Stage::Sort => StageConsts::SORT,
            Stage::Convert => StageConsts::CONVERT,
            Stage::Collation => StageConsts::COLLATION,
        }
    }

    /// Folder name for this stage: `"<stageNumber>-<semanticName>"`.
    pub fn folder_name(self, semantic_name: &str) -> String {
        format!("{}-{}", self.number(), semantic_name)
    }

    /// Prefix shared by all folders of this stage (e.g. `"02-"`).
    pub fn prefix(self) -> String {
        format!("{}-", self.number())
    }
}

/// A stage folder inside a run directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageFolder {
    pub parent: PathBuf,
    pub stage: Stage,
    pub semantic_name: String,
}

impl StageFolder {
    pub fn new(parent: &Path, stage: Stage, semantic_name: &str) -> Self {
        Self {
            parent: parent.to_path_buf(),
            stage,
            semantic_name: semantic_name.to_string(),
        }
    }

    pub fn name(&self) -> String {
        self.stage.folder_name(&self.semantic_name)
    }

    pub fn path(&self) -> PathBuf {
        self.parent.join(self.name())
    }
}

/// One entry of the configured module list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    pub name: String,
    pub enabled: bool,
    /// Abstract folder keys resolved through the [`FolderKeyMapping`].
    /// `None` targets the run directory itself.
    pub target_folder_keys: Option<Vec<String>>,
}

/// Abstract key (e.g. `Collation2`) → semantic folder name (e.g. `Enhancement`).
pub type FolderKeyMapping = BTreeMap<String, String>;

/// Why a dispatch failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchFailure {
    /// No handler could be resolved for the module name.
    ModuleNotFound,
    /// The handler returned an error for this target.
    Processing(String),
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchFailure::ModuleNotFound => write!(f, "module not found"),
            DispatchFailure::Processing(reason) => write!(f, "{reason}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchStatus {
    Success,
    SkippedMissingFolder,
    SkippedDisabled,
    Failed(DispatchFailure),
}

impl DispatchStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, DispatchStatus::Failed(_))
    }
}

/// Result of one module/target pair. Collected per run for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub module: String,
    /// Folder key the target came from, when the module targets collation folders.
    pub key: Option<String>,
    /// Resolved target folder. `None` when the module was disabled or the key had no mapping.
    pub target_folder: Option<PathBuf>,
    pub status: DispatchStatus,
}

/// Options for one batch invocation (CLI and lib).
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Settings directory holding `start.json` and `folders.json`. When None, `<DIR>/settings`.
    pub settings_dir: Option<PathBuf>,
    /// Debug-level console output.
    pub verbose: bool,
    /// Strict mode: abort the run on the first failed dispatch instead of continuing.
    pub strict: bool,
    /// Reuse the most recent existing run directory instead of creating a new one.
    pub reuse_latest: bool,
    /// Date used for the run directory code. When None, today's local date.
    pub today: Option<NaiveDate>,
}
