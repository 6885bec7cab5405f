//! Run directory management: one fresh `YYMMDD[_NN]` directory per batch invocation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use log::debug;
use regex::Regex;

use crate::error::{Error, Result};
use crate::utils::config::{RUN_DIR_CREATE_ATTEMPTS, RUN_DIR_PATTERN};
use crate::{RunDirectory, date_code};

/// Names of immediate subdirectories of `root` (sorted). Missing root → empty.
fn subdirectory_names(root: &Path) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let read = fs::read_dir(root).map_err(|source| Error::DirectoryList {
        path: root.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = read
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Suffix of an existing same-day directory name: `_NN` → NN, anything else → 0.
fn parse_suffix(name: &str, date_code: &str) -> u32 {
    name.strip_prefix(date_code)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Next free suffix for `date_code` among `existing` names, or None when no same-day folder exists.
pub fn next_suffix(existing: &[String], date_code: &str) -> Option<u32> {
    let same_day: Vec<&String> = existing
        .iter()
        .filter(|n| n.starts_with(date_code))
        .collect();
    if same_day.is_empty() {
        return None;
    }
    let max = same_day
        .iter()
        .map(|n| parse_suffix(n, date_code))
        .max()
        .unwrap_or(0);
    Some(max + 1)
}

/// Create a fresh run directory for `today` under `root` (root created if absent).
///
/// Name is `YYMMDD` when no directory of that day exists, else `YYMMDD_NN` with
/// NN = max existing suffix + 1. Never reuses an existing directory: if the computed name
/// appears between listing and creation, the suffix is bumped.
pub fn create_or_find_run_directory(root: &Path, today: NaiveDate) -> Result<RunDirectory> {
    let code = date_code(today);
    fs::create_dir_all(root).map_err(|source| Error::DirectoryCreate {
        path: root.to_path_buf(),
        source,
    })?;
    let existing = subdirectory_names(root)?;
    let mut run = RunDirectory {
        root: root.to_path_buf(),
        date_code: code.clone(),
        suffix: next_suffix(&existing, &code),
    };
    debug!(
        "{} existing run directories for {}",
        existing.iter().filter(|n| n.starts_with(&code)).count(),
        code
    );

    for _ in 0..RUN_DIR_CREATE_ATTEMPTS {
        let path = run.path();
        match fs::create_dir(&path) {
            Ok(()) => return Ok(run),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{} appeared concurrently, bumping suffix", path.display());
                run.suffix = Some(run.suffix.map_or(1, |n| n + 1));
            }
            Err(source) => return Err(Error::DirectoryCreate { path, source }),
        }
    }
    Err(Error::DirectoryCreate {
        path: run.path(),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free run directory name"),
    })
}

static RUN_DIR_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Compiled [`RUN_DIR_PATTERN`], built on first use.
fn run_dir_regex() -> Option<&'static Regex> {
    RUN_DIR_RE
        .get_or_init(|| Regex::new(RUN_DIR_PATTERN).ok())
        .as_ref()
}

/// Parse a directory name as a run directory (`YYMMDD` or `YYMMDD_NN`).
pub fn parse_run_directory(root: &Path, name: &str) -> Option<RunDirectory> {
    if !run_dir_regex()?.is_match(name) {
        return None;
    }
    let (code, suffix) = match name.split_once('_') {
        Some((code, n)) => (code, Some(n.parse().ok()?)),
        None => (name, None),
    };
    Some(RunDirectory {
        root: root.to_path_buf(),
        date_code: code.to_string(),
        suffix,
    })
}

/// Most recent run directory under `root`: greatest name matching `YYMMDD[_NN]`.
pub fn find_latest_run_directory(root: &Path) -> Result<RunDirectory> {
    subdirectory_names(root)?
        .iter()
        .rev()
        .find_map(|name| parse_run_directory(root, name))
        .ok_or_else(|| Error::NoDateFolder(root.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_dir_regex_is_compiled_once() {
        let first = run_dir_regex().unwrap();
        let second = run_dir_regex().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("251018_07"));
        assert!(!first.is_match("251018_7"));
    }
}
