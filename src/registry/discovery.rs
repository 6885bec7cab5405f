//! On-disk module discovery. A candidate must be a regular file whose stem matches the module
//! name (case-insensitive) and that can be executed directly.

use std::fs;
use std::path::{Path, PathBuf};

/// True if `path` is a regular file this platform can execute directly.
#[cfg(unix)]
pub fn is_invocable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_invocable(path: &Path) -> bool {
    let executable_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ["exe", "bat", "cmd"].iter().any(|x| e.eq_ignore_ascii_case(x)));
    path.is_file() && executable_ext
}

fn stem_matches(path: &Path, name: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(name))
}

/// First invocable file named `name` across `locations`, in location order.
/// Within one location, entries are checked in sorted order. Missing locations are skipped.
pub fn find_module_executable(locations: &[PathBuf], name: &str) -> Option<PathBuf> {
    for dir in locations {
        let Ok(read) = fs::read_dir(dir) else {
            continue;
        };
        let mut paths: Vec<PathBuf> = read.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();
        if let Some(found) = paths
            .into_iter()
            .find(|p| stem_matches(p, name) && is_invocable(p))
        {
            return Some(found);
        }
    }
    None
}
