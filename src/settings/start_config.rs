//! Serde shape of `start.json`. Every key is optional; defaults are applied per key.

use serde::Deserialize;

use crate::utils::config::SettingsDefaults;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartConfig {
    #[serde(default)]
    pub folder: FolderSection,
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub logger: LoggerSection,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FolderSection {
    /// Absent → `"image"`; explicit `null` → None (use the run root directly).
    #[serde(default = "default_folder_name")]
    pub foldername: Option<String>,
    #[serde(default)]
    pub folderpath: Option<String>,
    #[serde(default)]
    pub entrancepath: Option<String>,
}

impl Default for FolderSection {
    fn default() -> Self {
        Self {
            foldername: default_folder_name(),
            folderpath: None,
            entrancepath: None,
        }
    }
}

fn default_folder_name() -> Option<String> {
    Some(SettingsDefaults::FOLDER_NAME.to_string())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsSection {
    pub output_format: Option<String>,
    pub enter_confirmation: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoggerSection {
    pub logger_folder: Option<bool>,
    pub logging_enabled: Option<bool>,
    pub console_output: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub folders: Option<Vec<String>>,
}
