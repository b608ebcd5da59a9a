//! Collection discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use gfxstate_core::errors::Result;

use crate::format::COLLECTION_EXTENSION;

/// Finds every collection file under `root`, recursively, in sorted order.
///
/// A missing root yields an empty list.
pub fn find_collections(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        log::debug!("Collection folder {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_collection_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

#[must_use]
pub fn is_collection_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(COLLECTION_EXTENSION))
}
