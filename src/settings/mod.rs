//! Settings store: resolved configuration loaded once per run and passed by reference.
//!
//! Backed by `start.json` (required) and `folders.json` (optional) in the settings directory.
//! A missing optional key falls back to its default; only a missing `start.json` fails the load.

mod folder_mapping;
mod start_config;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::config::{SettingsDefaults, SettingsFiles};
use crate::{FolderKeyMapping, ModuleConfig};

use folder_mapping::load_folder_mapping;
use start_config::StartConfig;

/// Where run directories live and where input images come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderConfig {
    /// Sub-folder of the run root holding the date folders. None = the run root itself.
    pub folder_name: Option<String>,
    /// External root for run directories. None = working directory.
    pub folder_path: Option<PathBuf>,
    /// Source of input images for the sort stage.
    pub entrance_path: Option<PathBuf>,
}

/// Run log behaviour (`logger` section of start.json).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Put log files into `_log/` inside the run directory.
    pub logger_folder: bool,
    /// Write log files at all.
    pub logging_enabled: bool,
    /// Mirror run log records to the console.
    pub console_output: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            logger_folder: false,
            logging_enabled: true,
            console_output: true,
        }
    }
}

/// Resolved configuration. Read-only for the duration of a run.
#[derive(Clone, Debug)]
pub struct Settings {
    settings_dir: PathBuf,
    folder: FolderConfig,
    output_format: String,
    enter_confirmation: bool,
    logger: LoggerConfig,
    modules: Vec<ModuleConfig>,
    folder_mapping: FolderKeyMapping,
    notes: Vec<String>,
}

impl Settings {
    /// Load `start.json` and `folders.json` from `settings_dir`.
    pub fn load(settings_dir: &Path) -> Result<Settings> {
        let start_path = settings_dir.join(SettingsFiles::START);
        if !start_path.is_file() {
            return Err(Error::ConfigNotFound(start_path));
        }
        let s = std::fs::read_to_string(&start_path).map_err(|source| Error::ConfigRead {
            path: start_path.clone(),
            source,
        })?;
        let start: StartConfig =
            serde_json::from_str(&s).map_err(|source| Error::ConfigParse {
                path: start_path.clone(),
                source,
            })?;

        let mut notes = Vec::new();
        let mapping_path = settings_dir.join(SettingsFiles::FOLDER_MAPPING);
        let folder_mapping = match load_folder_mapping(&mapping_path)? {
            Some(m) => m,
            None => {
                notes.push(format!(
                    "{} not found; no collation folders will be provisioned",
                    mapping_path.display()
                ));
                FolderKeyMapping::new()
            }
        };

        let mut modules = Vec::with_capacity(start.modules.len());
        for (i, entry) in start.modules.into_iter().enumerate() {
            match entry.name.filter(|n| !n.trim().is_empty()) {
                Some(name) => modules.push(ModuleConfig {
                    name,
                    enabled: entry.enabled,
                    target_folder_keys: entry.folders,
                }),
                None => notes.push(format!("module entry #{} has no name; ignored", i + 1)),
            }
        }

        let output_format = start
            .settings
            .output_format
            .map(|f| normalize_format(&f))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| SettingsDefaults::OUTPUT_FORMAT.to_string());

        let logger = LoggerConfig {
            logger_folder: start.logger.logger_folder.unwrap_or(false),
            logging_enabled: start.logger.logging_enabled.unwrap_or(true),
            console_output: start.logger.console_output.unwrap_or(true),
        };

        Ok(Settings {
            settings_dir: settings_dir.to_path_buf(),
            folder: FolderConfig {
                folder_name: non_null(start.folder.foldername),
                folder_path: non_null(start.folder.folderpath).map(PathBuf::from),
                entrance_path: non_null(start.folder.entrancepath).map(PathBuf::from),
            },
            output_format,
            enter_confirmation: start.settings.enter_confirmation.unwrap_or(false),
            logger,
            modules,
            folder_mapping,
            notes,
        })
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    /// Output image format (lowercase, no dot). Names the `02-<format>` folder.
    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    pub fn folder_mapping(&self) -> &FolderKeyMapping {
        &self.folder_mapping
    }

    /// Configured modules in pipeline order.
    pub fn module_list(&self) -> &[ModuleConfig] {
        &self.modules
    }

    /// Enable flag of the first module named `name`. Unknown modules are disabled.
    pub fn is_module_enabled(&self, name: &str) -> bool {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .is_some_and(|m| m.enabled)
    }

    pub fn folder(&self) -> &FolderConfig {
        &self.folder
    }

    pub fn logger(&self) -> &LoggerConfig {
        &self.logger
    }

    pub fn enter_confirmation(&self) -> bool {
        self.enter_confirmation
    }

    /// Non-fatal observations made while loading (missing mapping file, unnamed modules).
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Directory that holds the date folders: `<folderpath or base>/<foldername>`.
    pub fn run_root(&self, base_dir: &Path) -> PathBuf {
        let parent = match &self.folder.folder_path {
            Some(p) => base_dir.join(p),
            None => base_dir.to_path_buf(),
        };
        match &self.folder.folder_name {
            Some(name) => parent.join(name),
            None => parent,
        }
    }

    /// Entrance path resolved against `base_dir`, if configured.
    pub fn entrance_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.folder.entrance_path.as_ref().map(|p| base_dir.join(p))
    }
}

fn normalize_format(format: &str) -> String {
    format.trim().trim_start_matches('.').to_lowercase()
}

/// Treat empty strings and the literals `null` / `none` as unset.
fn non_null(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case("null") && !v.eq_ignore_ascii_case("none")
    })
}
