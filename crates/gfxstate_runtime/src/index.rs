//! Collection Index
//!
//! Maps discovered collection files to their [`PlatformKey`]. Registration
//! reads only the header line of a file; collections are fully loaded only
//! when a lookup matches.
//!
//! The registry is rebuilt from scratch on every discovery pass. When several
//! files share a key, the first in discovery order wins.

use std::path::{Path, PathBuf};

use gfxstate_core::errors::Result;
use gfxstate_core::{Collection, PlatformKey};
use gfxstate_io::CollectionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: PathBuf,
    pub key: PlatformKey,
}

impl IndexEntry {
    /// Display name of the collection (file stem).
    #[must_use]
    pub fn name(&self) -> &str {
        CollectionStore::name_of(&self.path)
    }
}

#[derive(Debug, Clone)]
pub struct CollectionIndex {
    store: CollectionStore,
    entries: Vec<IndexEntry>,
}

impl CollectionIndex {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            entries: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Discovery pass: clears the registry and registers every collection
    /// file under the store root. Unreadable files are skipped with a warning.
    ///
    /// Returns the number of registered collections.
    pub fn rebuild(&mut self) -> Result<usize> {
        self.entries.clear();
        for path in self.store.discover()? {
            if let Err(e) = self.register(&path) {
                log::warn!("Skipping collection {}: {e}", path.display());
            }
        }
        log::debug!(
            "Collection index rebuilt from {}: {} collection(s)",
            self.store.root().display(),
            self.entries.len()
        );
        Ok(self.entries.len())
    }

    /// Registers one collection file and returns its key.
    pub fn register(&mut self, path: &Path) -> Result<PlatformKey> {
        if let Some(existing) = self.entries.iter().find(|e| e.path == path) {
            return Ok(existing.key.clone());
        }
        let key = self.store.read_key(path)?;
        self.entries.push(IndexEntry {
            path: path.to_path_buf(),
            key: key.clone(),
        });
        Ok(key)
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered entry whose key equals `target` exactly.
    #[must_use]
    pub fn find_entry(&self, target: &PlatformKey) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.key == *target)
    }

    /// Loads the first collection matching `target`.
    ///
    /// `Ok(None)` means no registered collection matches; callers create a
    /// new empty collection in that case.
    pub fn find_matching(&self, target: &PlatformKey) -> Result<Option<Collection>> {
        match self.find_entry(target) {
            Some(entry) => self.store.load(&entry.path).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfxstate_core::{GraphicsDeviceType, PassId, RuntimePlatform, StateRecord, VariantRecord};

    fn key(device: GraphicsDeviceType) -> PlatformKey {
        PlatformKey::new(RuntimePlatform::OSXPlayer, device, "Medium")
    }

    fn save(store: &CollectionStore, name: &str, device: GraphicsDeviceType) {
        let mut c = Collection::new(key(device));
        c.add_state(
            &VariantRecord::new("Lit", PassId::default(), ["_FOG"]),
            StateRecord::from_bytes(name.as_bytes().to_vec()),
        );
        store.save(&c, &store.path_for(name)).unwrap();
    }

    #[test]
    fn test_rebuild_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        save(&store, "Metal", GraphicsDeviceType::Metal);
        std::fs::write(store.path_for("Broken"), b"{}\n").unwrap();

        let mut index = CollectionIndex::new(store);
        assert_eq!(index.rebuild().unwrap(), 1);
        assert_eq!(index.entries()[0].name(), "Metal");
    }

    #[test]
    fn test_first_match_in_discovery_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        save(&store, "B_Metal", GraphicsDeviceType::Metal);
        save(&store, "A_Metal", GraphicsDeviceType::Metal);
        save(&store, "C_GL", GraphicsDeviceType::OpenGLCore);

        let mut index = CollectionIndex::new(store);
        index.rebuild().unwrap();
        assert_eq!(index.len(), 3);

        let found = index.find_matching(&key(GraphicsDeviceType::Metal)).unwrap().unwrap();
        let lit = VariantRecord::new("Lit", PassId::default(), ["_FOG"]);
        assert_eq!(found.states_for(&lit).unwrap()[0].as_bytes(), b"A_Metal");
        assert!(index.find_matching(&key(GraphicsDeviceType::Vulkan)).unwrap().is_none());
    }

    #[test]
    fn test_register_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        save(&store, "Metal", GraphicsDeviceType::Metal);
        let path = store.path_for("Metal");

        let mut index = CollectionIndex::new(store);
        assert_eq!(index.register(&path).unwrap(), key(GraphicsDeviceType::Metal));
        index.register(&path).unwrap();
        assert_eq!(index.len(), 1);
    }
}
