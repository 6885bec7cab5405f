//! Application configuration constants.
//! File names, folder conventions and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    toml_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                toml_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// CLI defaults file looked up in the working directory.
    pub fn toml_filename(&self) -> &str {
        &self.toml_filename
    }
}

// ---- Settings files ----

/// Settings directory layout.
pub struct SettingsFiles;

impl SettingsFiles {
    /// Settings directory name under the working directory.
    pub const DIR: &'static str = "settings";
    /// Main configuration (folders, output format, logger, modules).
    pub const START: &'static str = "start.json";
    /// Folder key → semantic name mapping for collation folders.
    pub const FOLDER_MAPPING: &'static str = "folders.json";
}

/// Per-key defaults applied when start.json omits them.
pub struct SettingsDefaults;

impl SettingsDefaults {
    pub const OUTPUT_FORMAT: &'static str = "png";
    /// Folder under the run root that holds the date folders.
    pub const FOLDER_NAME: &'static str = "image";
}

// ---- Stage folders ----

/// Stage numbers and derived folder names.
pub struct StageConsts;

impl StageConsts {
    pub const SORT: &'static str = "01";
    pub const CONVERT: &'static str = "02";
    pub const COLLATION: &'static str = "03";
    /// Prefix of scale-variant sub-folders (`x<percent>`).
    pub const SCALE_PREFIX: &'static str = "x";
}

/// Image extensions picked up by the sort stage (lowercase, no dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

// ---- Run directories ----

/// Pattern of a run directory name: `YYMMDD` or `YYMMDD_NN`.
pub const RUN_DIR_PATTERN: &str = r"^\d{6}(_\d{2})?$";

/// Upper bound on suffix bumps when a computed run directory name is taken concurrently.
pub const RUN_DIR_CREATE_ATTEMPTS: u32 = 100;

// ---- Module discovery ----

/// Directories (relative to the working directory) searched for module executables, in order.
/// The empty entry is the working directory itself.
pub const MODULE_SEARCH_DIRS: &[&str] = &["modules", "script", "", "settings", "transforms"];

/// Name of the built-in sort-stage module.
pub const PREPARE_INPUT_MODULE: &str = "prepareInput";

// ---- Run log ----

/// Run-scoped log files.
pub struct LogFiles;

impl LogFiles {
    /// Sub-folder used when `logger.logger_folder` is set.
    pub const DIR: &'static str = "_log";
    pub const LOG: &'static str = "log.txt";
    /// Warnings and errors only.
    pub const ERROR_LOG: &'static str = "error_log.txt";
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
}
