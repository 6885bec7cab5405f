//! Load the folder key mapping (`folders.json`): `{ "Collation1": "CleanUp", ... }`.

use std::path::Path;

use crate::FolderKeyMapping;
use crate::error::{Error, Result};

/// Load the mapping file at `path`. Missing file → `Ok(None)`; malformed → `ConfigParse`.
pub(crate) fn load_folder_mapping(path: &Path) -> Result<Option<FolderKeyMapping>> {
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mapping: FolderKeyMapping =
        serde_json::from_str(&s).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(mapping))
}
