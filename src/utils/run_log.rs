//! Run-scoped message sink. Every pipeline decision (skip, fail, success) goes through a
//! [`MessageSink`]; [`RunLog`] mirrors it to the console and to log files inside the run directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::Level;

use crate::settings::LoggerConfig;
use crate::utils::config::LogFiles;

pub trait MessageSink {
    fn record(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.record(Level::Error, message);
    }

    /// Apply the loaded logger settings. Called once, after settings load.
    fn configure(&mut self, _config: &LoggerConfig) {}

    /// Bind the sink to a run directory. Called once the run directory exists.
    fn attach(&mut self, _run_dir: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Production sink: console via `log`, files via append.
/// Records made before [`attach`](MessageSink::attach) are buffered and flushed on attach.
pub struct RunLog {
    config: LoggerConfig,
    pending: Vec<(Level, String)>,
    log_file: Option<File>,
    error_file: Option<File>,
    /// Set after the first failed write so the console gets one error, not one per record.
    write_failed: bool,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLog {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            pending: Vec::new(),
            log_file: None,
            error_file: None,
            write_failed: false,
        }
    }

    /// Directory the log files go to for `run_dir` under the current config.
    pub fn log_dir(&self, run_dir: &Path) -> PathBuf {
        if self.config.logger_folder {
            run_dir.join(LogFiles::DIR)
        } else {
            run_dir.to_path_buf()
        }
    }

    fn write_line(&mut self, level: Level, message: &str) {
        let line = format!(
            "{} - {} {}\n",
            Local::now().format(LogFiles::TIMESTAMP_FORMAT),
            level,
            message
        );
        let mut result = append(self.log_file.as_mut(), &line);
        if level <= Level::Warn {
            result = result.and(append(self.error_file.as_mut(), &line));
        }
        if let Err(e) = result
            && !self.write_failed
        {
            self.write_failed = true;
            log::error!("Cannot write run log: {}", e);
        }
    }
}

fn append(file: Option<&mut File>, line: &str) -> io::Result<()> {
    match file {
        Some(f) => f.write_all(line.as_bytes()),
        None => Ok(()),
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl MessageSink for RunLog {
    fn record(&mut self, level: Level, message: &str) {
        if self.config.console_output {
            log::log!(level, "{}", message);
        }
        if !self.config.logging_enabled {
            return;
        }
        if self.log_file.is_some() {
            self.write_line(level, message);
        } else {
            self.pending.push((level, message.to_string()));
        }
    }

    fn configure(&mut self, config: &LoggerConfig) {
        self.config = *config;
        if !config.logging_enabled {
            self.pending.clear();
        }
    }

    fn attach(&mut self, run_dir: &Path) -> io::Result<()> {
        if !self.config.logging_enabled {
            return Ok(());
        }
        let dir = self.log_dir(run_dir);
        fs::create_dir_all(&dir)?;
        self.log_file = Some(open_append(&dir.join(LogFiles::LOG))?);
        self.error_file = Some(open_append(&dir.join(LogFiles::ERROR_LOG))?);
        for (level, message) in std::mem::take(&mut self.pending) {
            self.write_line(level, &message);
        }
        Ok(())
    }
}
