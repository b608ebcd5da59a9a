//! Editor command surface.
//!
//! The two user-invoked actions: combining the selected collections and
//! refreshing the collection list. Neither takes arguments beyond the current
//! selection.

use std::path::PathBuf;

use gfxstate_core::errors::Result;
use gfxstate_io::{CollectionStore, is_collection_file};
use gfxstate_runtime::CollectionIndex;

use crate::combine::{MergeReport, Merger};

/// Assets currently selected in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub paths: Vec<PathBuf>,
    /// The asset the user selected first, if known.
    pub active: Option<PathBuf>,
}

impl Selection {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            active: None,
        }
    }

    #[must_use]
    pub fn with_active(mut self, active: impl Into<PathBuf>) -> Self {
        self.active = Some(active.into());
        self
    }

    /// Selected paths that are collection files.
    pub fn collections(&self) -> impl Iterator<Item = &PathBuf> + '_ {
        self.paths.iter().filter(|p| is_collection_file(p))
    }
}

pub struct EditorCommands {
    store: CollectionStore,
}

impl EditorCommands {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// "Combine" is offered only with more than one collection selected.
    #[must_use]
    pub fn can_combine(selection: &Selection) -> bool {
        selection.collections().nth(1).is_some()
    }

    /// Combines the selected collections into the active one (or the first
    /// selected collection when the active asset is not a collection).
    ///
    /// Returns `Ok(None)` when fewer than two collections are selected.
    pub fn combine_selected(&self, selection: &Selection) -> Result<Option<MergeReport>> {
        if !Self::can_combine(selection) {
            return Ok(None);
        }
        let collections: Vec<PathBuf> = selection.collections().cloned().collect();
        let destination = selection
            .active
            .as_ref()
            .filter(|active| collections.contains(active))
            .unwrap_or(&collections[0])
            .clone();

        Merger::new(&self.store)
            .combine_files(&destination, &collections)
            .map(Some)
    }

    /// Rescans the canonical folder into `index`.
    pub fn update_collection_list(&self, index: &mut CollectionIndex) -> Result<usize> {
        let count = index.rebuild()?;
        log::info!("Collection list updated: {count} collection(s) found");
        Ok(count)
    }
}
