//! Planned file relocation.
//!
//! Moves are collected into a [`RelocationPlan`], verified as a whole, and
//! only then applied. If one move fails, the moves already applied are undone
//! in reverse order so the file set is left as it was found.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use gfxstate_core::errors::{GfxStateError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct RelocationPlan {
    moves: Vec<Relocation>,
}

impl RelocationPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        self.moves.push(Relocation {
            from: from.into(),
            to: to.into(),
        });
    }

    #[inline]
    #[must_use]
    pub fn moves(&self) -> &[Relocation] {
        &self.moves
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Every source exists, no destination is occupied, no two moves share a
    /// destination.
    pub fn verify(&self) -> Result<()> {
        let mut targets = FxHashSet::default();
        for m in &self.moves {
            if !m.from.is_file() {
                return Err(GfxStateError::RelocationRejected(format!(
                    "source {} does not exist",
                    m.from.display()
                )));
            }
            if m.to.exists() {
                return Err(GfxStateError::RelocationRejected(format!(
                    "destination {} is already occupied",
                    m.to.display()
                )));
            }
            if !targets.insert(m.to.as_path()) {
                return Err(GfxStateError::RelocationRejected(format!(
                    "two files would move to {}",
                    m.to.display()
                )));
            }
        }
        Ok(())
    }

    /// Verifies, then applies every move; all-or-nothing.
    pub fn apply(self) -> Result<Vec<Relocation>> {
        self.verify()?;

        let mut applied: Vec<Relocation> = Vec::with_capacity(self.moves.len());
        for m in self.moves {
            if let Err(e) = move_file(&m.from, &m.to) {
                for done in applied.iter().rev() {
                    if let Err(undo) = move_file(&done.to, &done.from) {
                        log::error!(
                            "Rollback failed, {} is left at {}: {undo}",
                            done.from.display(),
                            done.to.display()
                        );
                    }
                }
                return Err(e);
            }
            applied.push(m);
        }
        Ok(applied)
    }
}

/// Moves one file, creating the destination directory and falling back to
/// copy + delete across devices.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    let wrap = |source: std::io::Error| GfxStateError::RelocationFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(wrap)?;
            fs::remove_file(from).map_err(wrap)
        }
        Err(e) => Err(wrap(e)),
    }
}

/// Absolute, symlink-free spelling of `path`, used to compare paths by the
/// file they name. Trailing components that do not exist yet are kept as
/// written.
#[must_use]
pub fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    let mut missing = Vec::new();
    let mut current = absolute.as_path();
    loop {
        if let Ok(resolved) = fs::canonicalize(current) {
            return missing
                .iter()
                .rev()
                .fold(resolved, |acc: PathBuf, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                current = parent;
            }
            _ => return absolute.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_rejects_occupied_destination() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let mut plan = RelocationPlan::new();
        plan.push(&a, &b);
        assert!(matches!(plan.verify(), Err(GfxStateError::RelocationRejected(_))));
    }

    #[test]
    fn test_missing_source_moves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, "a").unwrap();
        let missing = dir.path().join("missing");

        let mut plan = RelocationPlan::new();
        plan.push(&a, dir.path().join("hold/a"));
        plan.push(&missing, dir.path().join("hold/missing"));

        assert!(plan.apply().is_err());
        assert!(a.exists());
        assert!(!dir.path().join("hold/a").exists());
    }

    #[test]
    fn test_apply_moves_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, "payload").unwrap();

        let mut plan = RelocationPlan::new();
        plan.push(&a, dir.path().join("deep/hold/a"));
        let applied = plan.apply().unwrap();

        assert_eq!(applied.len(), 1);
        assert!(!a.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("deep/hold/a")).unwrap(),
            "payload"
        );
    }

    #[test]
    fn test_resolve_path_normalizes_aliases() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c/a"), "a").unwrap();

        let direct = resolve_path(&dir.path().join("c/a"));
        assert_eq!(resolve_path(&dir.path().join("c/../c/a")), direct);
        assert_eq!(
            resolve_path(&dir.path().join("c/../c/later/x")),
            direct.parent().unwrap().join("later/x")
        );
    }
}
