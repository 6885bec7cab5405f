//! Shared fixtures: settings writers, handler doubles, in-memory sink.

#![allow(dead_code)]

use chrono::NaiveDate;
use log::Level;
use serde_json::Value;
use stagerun::{Handler, MessageSink, ProcessingError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
}

pub const TODAY_CODE: &str = "251018";

/// Write `settings/start.json` (and `settings/folders.json` when given) under `base`.
pub fn write_settings(base: &Path, start: &Value, mapping: Option<&Value>) {
    let dir = base.join("settings");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("start.json"), start.to_string()).unwrap();
    if let Some(m) = mapping {
        std::fs::write(dir.join("folders.json"), m.to_string()).unwrap();
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub records: Vec<(Level, String)>,
}

impl MemorySink {
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl MessageSink for MemorySink {
    fn record(&mut self, level: Level, message: &str) {
        self.records.push((level, message.to_string()));
    }
}

/// Records every folder it is called with. Fails for folders whose name is in `fail_on`.
#[derive(Default)]
pub struct RecordingHandler {
    pub calls: Mutex<Vec<PathBuf>>,
    pub fail_on: Vec<String>,
}

impl RecordingHandler {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_folders(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl Handler for RecordingHandler {
    fn process_folder(&self, folder: &Path) -> Result<(), ProcessingError> {
        self.calls.lock().unwrap().push(folder.to_path_buf());
        let name = folder.file_name().unwrap().to_string_lossy();
        if self.fail_on.iter().any(|f| *f == name) {
            return Err(ProcessingError::new(format!("cannot process {name}")));
        }
        Ok(())
    }
}
