//! Build-time Collection Stripping
//!
//! A build should only ship the collections captured for its own platform: a
//! Windows build must not carry OSX or Android collections. [`BuildStripper`]
//! moves every mismatched collection file (with its sidecar) into a holding
//! folder before the build and moves them back afterwards.
//!
//! # State Machine
//!
//! ```text
//!   Ready ──on_preprocess──▶ Stripped ──on_postprocess──▶ Restored
//! ```
//!
//! Restoring runs whatever the build outcome was. A file that cannot be moved
//! back is logged and kept in the pending list so [`BuildStripper::retry_restore`]
//! can try again; the remaining files are still restored. Dropping a stripper
//! that is still `Stripped` restores its files.
//!
//! Calling `on_preprocess` again while files are still stripped is refused
//! with [`GfxStateError::StripInProgress`] so the first strip's records are
//! never lost.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use gfxstate_core::BuildTarget;
use gfxstate_core::errors::{GfxStateError, Result};
use gfxstate_io::{CollectionStore, meta_path};

use crate::relocation::{RelocationPlan, move_file, resolve_path};

/// Default holding folder (relative to the project root).
pub const DEFAULT_HOLDING_FOLDER: &str = "Temp/StrippedGraphicsStateCollections";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildResult {
    #[default]
    Unknown,
    Succeeded,
    Failed,
    Cancelled,
}

/// What the host build pipeline tells the stripper about the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub target: BuildTarget,
    pub result: BuildResult,
}

impl BuildReport {
    #[must_use]
    pub fn new(target: BuildTarget) -> Self {
        Self {
            target,
            result: BuildResult::Unknown,
        }
    }

    #[must_use]
    pub fn with_result(mut self, result: BuildResult) -> Self {
        self.result = result;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripSettings {
    pub holding_folder: PathBuf,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self {
            holding_folder: PathBuf::from(DEFAULT_HOLDING_FOLDER),
        }
    }
}

/// One file moved out of the build input set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedFile {
    pub original_path: PathBuf,
    pub temp_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripperState {
    Ready,
    Stripped,
    Restored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripSummary {
    /// Collections left in place for the build.
    pub kept: Vec<PathBuf>,
    /// Collections moved to the holding folder.
    pub stripped: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub restored: usize,
    pub failed: Vec<StrippedFile>,
}

impl RestoreSummary {
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct BuildStripper {
    store: CollectionStore,
    holding_root: PathBuf,
    state: StripperState,
    stripped: Vec<StrippedFile>,
}

impl BuildStripper {
    /// `holding_root` must not lie inside the store's folder; `on_preprocess`
    /// rejects such a layout.
    pub fn new(store: CollectionStore, holding_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            holding_root: holding_root.into(),
            state: StripperState::Ready,
            stripped: Vec::new(),
        }
    }

    /// Stripper for a project laid out with the given folders.
    #[must_use]
    pub fn for_project(
        project_root: &Path,
        collection_folder: &Path,
        settings: &StripSettings,
    ) -> Self {
        Self::new(
            CollectionStore::new(project_root.join(collection_folder)),
            project_root.join(&settings.holding_folder),
        )
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> StripperState {
        self.state
    }

    /// Files currently recorded as moved out (pending restore).
    #[inline]
    #[must_use]
    pub fn stripped_files(&self) -> &[StrippedFile] {
        &self.stripped
    }

    /// Moves every collection not matching `report.target` out of the store.
    pub fn on_preprocess(&mut self, report: &BuildReport) -> Result<StripSummary> {
        if !self.stripped.is_empty() {
            return Err(GfxStateError::StripInProgress(self.stripped.len()));
        }
        if resolve_path(&self.holding_root).starts_with(resolve_path(self.store.root())) {
            return Err(GfxStateError::RelocationRejected(format!(
                "holding folder {} lies inside collection folder {}",
                self.holding_root.display(),
                self.store.root().display()
            )));
        }

        let mut summary = StripSummary::default();
        let mut plan = RelocationPlan::new();
        for path in self.store.discover()? {
            let keep = match self.store.read_key(&path) {
                Ok(key) => report.target.matches(key.runtime_platform),
                Err(e) => {
                    log::warn!("Stripping unreadable collection {}: {e}", path.display());
                    false
                }
            };
            if keep {
                summary.kept.push(path);
                continue;
            }

            plan.push(&path, self.temp_path_for(&path));
            let meta = meta_path(&path);
            if meta.exists() {
                let temp = self.temp_path_for(&meta);
                plan.push(meta, temp);
            }
            summary.stripped.push(path);
        }

        let applied = plan.apply()?;
        self.stripped = applied
            .into_iter()
            .map(|m| StrippedFile {
                original_path: m.from,
                temp_path: m.to,
            })
            .collect();
        self.state = StripperState::Stripped;

        log::info!(
            "Stripped {} GraphicsStateCollection(s) not matching {} ({} kept)",
            summary.stripped.len(),
            report.target,
            summary.kept.len()
        );
        Ok(summary)
    }

    /// Moves every stripped file back, whatever the build result was.
    pub fn on_postprocess(&mut self, report: &BuildReport) -> RestoreSummary {
        log::debug!(
            "Restoring stripped collections after {} build ({:?})",
            report.target,
            report.result
        );
        self.restore_pending()
    }

    /// Retries the files a previous restore could not move back.
    pub fn retry_restore(&mut self) -> RestoreSummary {
        self.restore_pending()
    }

    fn restore_pending(&mut self) -> RestoreSummary {
        let mut summary = RestoreSummary::default();
        for file in std::mem::take(&mut self.stripped) {
            if !file.temp_path.exists() {
                log::error!(
                    "Cannot restore {}: {} is missing",
                    file.original_path.display(),
                    file.temp_path.display()
                );
                summary.failed.push(file);
                continue;
            }
            if file.original_path.exists() {
                log::error!(
                    "Cannot restore {}: a file already exists there",
                    file.original_path.display()
                );
                summary.failed.push(file);
                continue;
            }
            match move_file(&file.temp_path, &file.original_path) {
                Ok(()) => summary.restored += 1,
                Err(e) => {
                    log::error!("{e}");
                    summary.failed.push(file);
                }
            }
        }

        self.stripped.clone_from(&summary.failed);
        self.state = StripperState::Restored;
        if summary.is_complete() {
            self.remove_empty_holding_dirs();
            log::info!("Restored {} stripped file(s)", summary.restored);
        } else {
            log::error!(
                "{} stripped file(s) could not be restored; call retry_restore()",
                summary.failed.len()
            );
        }
        summary
    }

    /// Holding path mirrors the file's location relative to the store root.
    fn temp_path_for(&self, path: &Path) -> PathBuf {
        let relative = path
            .strip_prefix(self.store.root())
            .unwrap_or_else(|_| Path::new(path.file_name().unwrap_or_default()));
        self.holding_root.join(relative)
    }

    fn remove_empty_holding_dirs(&self) {
        let dirs = WalkDir::new(&self.holding_root)
            .contents_first(true)
            .into_iter()
            .flatten()
            .filter(|entry| entry.file_type().is_dir());
        for dir in dirs {
            if let Err(e) = fs::remove_dir(dir.path())
                && e.kind() != ErrorKind::DirectoryNotEmpty
            {
                log::debug!("Keeping holding folder {}: {e}", dir.path().display());
            }
        }
    }
}

impl Drop for BuildStripper {
    fn drop(&mut self) {
        if self.state == StripperState::Stripped && !self.stripped.is_empty() {
            log::warn!("BuildStripper dropped before post-processing; restoring files");
            self.restore_pending();
        }
    }
}
