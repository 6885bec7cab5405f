//! Process-isolated handler: runs a module executable with the target folder as its only argument.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessingError;

use super::Handler;

pub struct ProcessHandler {
    program: PathBuf,
}

impl ProcessHandler {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl Handler for ProcessHandler {
    /// Non-zero exit or launch failure becomes a [`ProcessingError`]; the child's output is inherited.
    fn process_folder(&self, folder: &Path) -> Result<(), ProcessingError> {
        let status = Command::new(&self.program)
            .arg(folder)
            .status()
            .map_err(|e| {
                ProcessingError::new(format!("cannot launch {}: {}", self.program.display(), e))
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessingError::new(format!(
                "{} exited with {}",
                self.program.display(),
                status
            )))
        }
    }
}
