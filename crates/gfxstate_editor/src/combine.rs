//! Collection Combining
//!
//! Folds several collection files into one. Only collections captured for the
//! exact same platform, graphics API and quality level can be combined, since
//! pipeline states are not portable across any of those.
//!
//! Deduplication is by content, so combining the same source twice adds
//! nothing the second time. Consumed sources are deleted; the destination is
//! always rewritten, even when nothing was added.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use gfxstate_core::errors::Result;
use gfxstate_core::{Collection, KeyMismatches, MergeStats};
use gfxstate_io::CollectionStore;

use crate::relocation::resolve_path;

/// A source collection and the file backing it.
#[derive(Debug, Clone)]
pub struct SourceCollection {
    pub path: PathBuf,
    pub collection: Collection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub mismatches: KeyMismatches,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added_variants: usize,
    pub added_states: usize,
    /// Sources folded into the destination (their files are consumed).
    pub combined: Vec<PathBuf>,
    /// Sources left alone because their platform key differs.
    pub skipped: Vec<SkippedSource>,
}

/// Folds `sources` into `destination` in memory.
///
/// Sources with a different platform key are reported in
/// [`MergeReport::skipped`] and leave `destination` untouched.
pub fn combine(destination: &mut Collection, sources: &[SourceCollection]) -> MergeReport {
    let mut report = MergeReport::default();
    let mut totals = MergeStats::default();

    for source in sources {
        match destination.merge_from(&source.collection) {
            Ok(stats) => {
                totals += stats;
                report.combined.push(source.path.clone());
            }
            Err(mismatches) => {
                report.skipped.push(SkippedSource {
                    path: source.path.clone(),
                    mismatches,
                });
            }
        }
    }

    report.added_variants = totals.added_variants;
    report.added_states = totals.added_states;
    report
}

/// File-backed combining on top of a [`CollectionStore`].
pub struct Merger<'a> {
    store: &'a CollectionStore,
}

impl<'a> Merger<'a> {
    #[must_use]
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    /// Combines the collection files `sources` into the file `destination`.
    ///
    /// Every file is loaded before anything is written, so a corrupt source
    /// aborts the whole operation without side effects. Paths are compared by
    /// the file they resolve to: a source naming the destination is ignored
    /// and a source listed more than once is merged once.
    pub fn combine_files(&self, destination: &Path, sources: &[PathBuf]) -> Result<MergeReport> {
        let mut result = self.store.load(destination)?;

        let mut seen = FxHashSet::default();
        seen.insert(resolve_path(destination));
        let loaded = sources
            .iter()
            .filter(|path| seen.insert(resolve_path(path)))
            .map(|path| {
                Ok(SourceCollection {
                    path: path.clone(),
                    collection: self.store.load(path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let report = combine(&mut result, &loaded);

        for skipped in &report.skipped {
            log::error!(
                "Skip combining {} into {} because platform or gfx api or quality level \
                 does not match ({}).",
                skipped.path.display(),
                destination.display(),
                skipped.mismatches
            );
        }

        self.store.save(&result, destination)?;
        for path in &report.combined {
            self.store.delete(path)?;
        }

        log::info!(
            "Combined {} GraphicsStateCollections into {}. \
             Added {} variants and {} graphics states.",
            report.combined.len(),
            destination.display(),
            report.added_variants,
            report.added_states
        );
        Ok(report)
    }
}
