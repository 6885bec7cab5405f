//! Sort stage: copy input images from the entrance path into `01-<ext>` folders.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::Stage;
use crate::error::ProcessingError;
use crate::registry::Handler;
use crate::utils::config::SUPPORTED_EXTENSIONS;

/// Lowercase extension of `path` if it is a supported image type.
pub fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    SUPPORTED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Walk `source` and yield supported image files, skipping anything under `exclude`.
fn image_files<'a>(
    source: &Path,
    exclude: Option<&'a Path>,
) -> impl Iterator<Item = (PathBuf, String)> + 'a {
    WalkDir::new(source)
        .into_iter()
        .filter_entry(move |e| exclude.is_none_or(|x| !e.path().starts_with(x)))
        .filter_map(|r| match r {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable input path: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let ext = image_extension(e.path())?;
            Some((e.into_path(), ext))
        })
}

/// Distinct supported extensions found under `source` (recursive).
pub fn scan_input_extensions(source: &Path, exclude: Option<&Path>) -> BTreeSet<String> {
    image_files(source, exclude).map(|(_, ext)| ext).collect()
}

/// First free path for `file_name` in `dir`: `name.ext`, then `name_1.ext`, `name_2.ext`, …
fn unique_target(dir: &Path, file_name: &str) -> PathBuf {
    let target = dir.join(file_name);
    if !target.exists() {
        return target;
    }
    let p = Path::new(file_name);
    let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    let ext = p.extension().and_then(|s| s.to_str());
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(target)
}

/// Copy every supported image under `source` into `run_dir/01-<ext>/`. Returns copies per extension.
/// Every file is attempted; if any could not be sorted the error lists them all.
pub fn sort_inputs(
    source: &Path,
    run_dir: &Path,
    exclude: Option<&Path>,
) -> Result<BTreeMap<String, usize>, ProcessingError> {
    if !source.is_dir() {
        return Err(ProcessingError::new(format!(
            "entrance path does not exist: {}",
            source.display()
        )));
    }
    let mut counts = BTreeMap::new();
    let mut failures = Vec::new();
    for (file, ext) in image_files(source, exclude) {
        let folder = run_dir.join(Stage::Sort.folder_name(&ext));
        if let Err(e) = fs::create_dir_all(&folder) {
            failures.push(format!(
                "{}: cannot create {}: {}",
                file.display(),
                folder.display(),
                e
            ));
            continue;
        }
        let Some(file_name) = file.file_name().and_then(|n| n.to_str()) else {
            failures.push(format!("{}: file name is not valid UTF-8", file.display()));
            continue;
        };
        let target = unique_target(&folder, file_name);
        match fs::copy(&file, &target) {
            Ok(_) => {
                debug!("{} -> {}", file.display(), target.display());
                *counts.entry(ext).or_insert(0) += 1;
            }
            Err(e) => failures.push(format!("{}: cannot copy: {}", file.display(), e)),
        }
    }
    if !failures.is_empty() {
        return Err(ProcessingError::new(format!(
            "{} of {} input files not sorted: {}",
            failures.len(),
            failures.len() + counts.values().sum::<usize>(),
            failures.join("; ")
        )));
    }
    Ok(counts)
}

/// Built-in sort stage module. Targets the run directory.
pub struct SortInputHandler {
    source: PathBuf,
    exclude: Option<PathBuf>,
}

impl SortInputHandler {
    /// `exclude` is typically the run root, so earlier runs inside the entrance path are not re-sorted.
    pub fn new(source: PathBuf, exclude: Option<PathBuf>) -> Self {
        Self { source, exclude }
    }
}

impl Handler for SortInputHandler {
    fn process_folder(&self, folder: &Path) -> Result<(), ProcessingError> {
        let counts = sort_inputs(&self.source, folder, self.exclude.as_deref())?;
        for (ext, n) in &counts {
            debug!("sorted .{}: {} files", ext, n);
        }
        Ok(())
    }
}
