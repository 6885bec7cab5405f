//! Load `.stagerun.toml` from the working directory (CLI only). Lib callers pass [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct StagerunToml {
    #[serde(default)]
    settings: RunSection,
}

#[derive(Debug, Default, Deserialize)]
struct RunSection {
    settings_dir: Option<String>,
    verbose: Option<bool>,
    strict: Option<bool>,
    latest: Option<bool>,
}

/// Load `.stagerun.toml` from `dir`. Missing file → `Ok(None)`; unreadable or malformed → error.
pub(crate) fn load_stagerun_toml(dir: &Path) -> Result<Option<StagerunToml>> {
    let path = dir.join(PackagePaths::get().toml_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file = toml::from_str(&s).with_context(|| format!("invalid {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file values to opts (only fields present in the file). Call before applying CLI flags.
/// A relative `settings_dir` is taken relative to `dir`.
pub(crate) fn apply_file_to_opts(file: &StagerunToml, dir: &Path, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.settings_dir {
        opts.settings_dir = Some(dir.join(PathBuf::from(p)));
    }
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, strict => strict);
    apply_file_opt!(sec, opts, latest => reuse_latest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_fill_opts() {
        let file: StagerunToml =
            toml::from_str("[settings]\nsettings_dir = \"conf\"\nstrict = true\n").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, Path::new("/work"), &mut opts);
        assert_eq!(opts.settings_dir, Some(PathBuf::from("/work/conf")));
        assert!(opts.strict);
        assert!(!opts.verbose);
        assert!(!opts.reuse_latest);
    }

    #[test]
    fn missing_file_is_none_and_malformed_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_stagerun_toml(tmp.path()).unwrap().is_none());

        std::fs::write(
            tmp.path().join(".stagerun.toml"),
            "[settings]\nstrict = \"yes-please\"\n",
        )
        .unwrap();
        let err = load_stagerun_toml(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains(".stagerun.toml"));
    }
}
