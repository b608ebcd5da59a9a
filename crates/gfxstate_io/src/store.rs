//! Collection Store
//!
//! [`CollectionStore`] owns the canonical collection folder and is the only
//! place that touches collection files: discovery, header reads, full loads,
//! saves and deletions (each of which keeps the sidecar metadata in step).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use gfxstate_core::errors::{GfxStateError, Result};
use gfxstate_core::{Collection, PlatformKey};

use crate::discovery::find_collections;
use crate::format::{self, COLLECTION_EXTENSION, CollectionHeader};
use crate::meta::{ensure_meta, meta_path};

#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: PathBuf,
}

impl CollectionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the collection file called `name` inside the store.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{COLLECTION_EXTENSION}"))
    }

    /// File stem of a collection path, used as its display name.
    #[must_use]
    pub fn name_of(path: &Path) -> &str {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// All collection files under the root, in discovery order.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        find_collections(&self.root)
    }

    /// Reads only the header of a collection file.
    pub fn read_header(&self, path: &Path) -> Result<CollectionHeader> {
        let mut reader = BufReader::new(File::open(path)?);
        format::read_header(&mut reader, path)
    }

    pub fn read_key(&self, path: &Path) -> Result<PlatformKey> {
        Ok(self.read_header(path)?.key)
    }

    pub fn load(&self, path: &Path) -> Result<Collection> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                GfxStateError::CollectionNotFound(path.display().to_string())
            }
            _ => GfxStateError::IoError(e),
        })?;
        format::read_collection(BufReader::new(file), path)
    }

    /// Writes `collection` to `path`, replacing any previous content.
    ///
    /// The sidecar metadata file is created on first save and kept afterwards.
    pub fn save(&self, collection: &Collection, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        format::write_collection(writer, collection)?;
        ensure_meta(path)?;
        log::debug!(
            "Saved {} ({} variants, {} states)",
            path.display(),
            collection.variant_count(),
            collection.total_state_count()
        );
        Ok(())
    }

    /// Deletes a collection file and its sidecar.
    pub fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        let meta = meta_path(path);
        if meta.exists() {
            fs::remove_file(meta)?;
        }
        Ok(())
    }
}
