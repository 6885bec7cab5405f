//! Error types for the orchestration engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by settings loading, run-directory management, provisioning and module resolution.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("malformed configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no modules configured")]
    NoModules,

    #[error("no date folder (YYMMDD or YYMMDD_NN) found in {}", .0.display())]
    NoDateFolder(PathBuf),

    #[error("cannot create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list directory {}: {source}", path.display())]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module not found: {0}")]
    ModuleNotFound(String),
}

impl Error {
    /// True for conditions that abort the whole run.
    ///
    /// `ModuleNotFound` is handled at dispatch level and never aborts. A directory-creation
    /// failure is fatal only for the run directory itself; stage folder failures are logged by
    /// the caller, which decides not to propagate them.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::ModuleNotFound(_))
    }
}

/// Failure reported by a handler's `process_folder`. The orchestrator records the reason verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ProcessingError {
    pub reason: String,
}

impl ProcessingError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
