//! Module registry: resolves a configured module name to a [`Handler`].
//!
//! Handlers come from two places, checked in order:
//! 1. static registration ([`ModuleRegistry::register`]), e.g. built-in modules or test doubles;
//! 2. discovery of an executable named after the module in the search locations
//!    (see [`discovery`]), run as an isolated child process (see [`process`]).
//!
//! Name matching is case-insensitive in both cases.

pub mod discovery;
pub mod process;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::error::{Error, ProcessingError, Result};
use crate::utils::config::MODULE_SEARCH_DIRS;

pub use discovery::find_module_executable;
pub use process::ProcessHandler;

/// The single contract every processing module exposes: transform the contents of one folder in place.
pub trait Handler {
    fn process_folder(&self, folder: &Path) -> std::result::Result<(), ProcessingError>;
}

/// Name → handler lookup with on-disk discovery as fallback.
#[derive(Default)]
pub struct ModuleRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
    search_locations: Vec<PathBuf>,
}

impl ModuleRegistry {
    /// Empty registry with no search locations (static registration only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry searching the standard locations under `base_dir`:
    /// `modules/`, `script/`, the base directory, `settings/`, `transforms/`.
    pub fn with_default_locations(base_dir: &Path) -> Self {
        let search_locations = MODULE_SEARCH_DIRS
            .iter()
            .map(|d| {
                if d.is_empty() {
                    base_dir.to_path_buf()
                } else {
                    base_dir.join(d)
                }
            })
            .collect();
        Self {
            handlers: HashMap::new(),
            search_locations,
        }
    }

    pub fn with_search_locations(search_locations: Vec<PathBuf>) -> Self {
        Self {
            handlers: HashMap::new(),
            search_locations,
        }
    }

    /// Register `handler` under `name`. Replaces an earlier registration of the same name.
    pub fn register(&mut self, name: &str, handler: Arc<dyn Handler>) {
        self.handlers.insert(name.to_lowercase(), handler);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_lowercase())
    }

    pub fn search_locations(&self) -> &[PathBuf] {
        &self.search_locations
    }

    /// Resolve `name` to a handler: registered handlers first, then discovery.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Handler>> {
        if let Some(h) = self.handlers.get(&name.to_lowercase()) {
            debug!("module {} resolved from registry", name);
            return Ok(Arc::clone(h));
        }
        match find_module_executable(&self.search_locations, name) {
            Some(program) => {
                debug!("module {} found at {}", name, program.display());
                Ok(Arc::new(ProcessHandler::new(program)))
            }
            None => Err(Error::ModuleNotFound(name.to_string())),
        }
    }
}
