//! Sidecar metadata files.
//!
//! Every collection `Foo.gfxstate` has a companion `Foo.gfxstate.meta` holding
//! a stable guid. The pair always moves and is deleted together.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gfxstate_core::errors::Result;

pub const META_EXTENSION: &str = "meta";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub guid: Uuid,
}

/// Path of the sidecar file belonging to `path`.
#[must_use]
pub fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(META_EXTENSION);
    PathBuf::from(name)
}

pub fn read_meta(path: &Path) -> Result<CollectionMeta> {
    let data = fs::read(meta_path(path))?;
    Ok(serde_json::from_slice(&data)?)
}

/// Reads the sidecar of `path`, creating it with a fresh guid if absent.
pub fn ensure_meta(path: &Path) -> Result<CollectionMeta> {
    let meta_file = meta_path(path);
    if meta_file.exists() {
        return read_meta(path);
    }

    let meta = CollectionMeta {
        guid: Uuid::new_v4(),
    };
    fs::write(&meta_file, serde_json::to_vec_pretty(&meta)?)?;
    log::debug!("Created metadata file {}", meta_file.display());
    Ok(meta)
}
