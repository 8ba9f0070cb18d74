//! Non-recursive tile directory scan.
//!
//! Stage A enumerates `tiles_dir`, keeps entries whose lowercased
//! extension is `.png`, and silently drops anything else - including
//! files that pass the extension check but fail to decode.

use crate::error::{IoError, Result};
use std::path::{Path, PathBuf};

/// Lists the `.png` files directly inside `tiles_dir` (case-insensitive
/// extension match, no recursion into subdirectories).
pub fn scan_png_files<P: AsRef<Path>>(tiles_dir: P) -> Result<Vec<PathBuf>> {
    let tiles_dir = tiles_dir.as_ref();
    let entries = std::fs::read_dir(tiles_dir).map_err(|source| IoError::TilesDir {
        path: tiles_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IoError::TilesDir { path: tiles_dir.to_path_buf(), source })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            files.push(path);
        }
    }
    Ok(files)
}
