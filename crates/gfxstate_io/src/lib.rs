//! # gfxstate io
//!
//! Persistence for graphics state collections: the on-disk format, sidecar
//! metadata files, discovery of collection files and the [`CollectionStore`]
//! that ties them together.

pub mod discovery;
pub mod format;
pub mod meta;
pub mod store;

pub use discovery::{find_collections, is_collection_file};
pub use format::{COLLECTION_EXTENSION, CollectionHeader};
pub use meta::{CollectionMeta, ensure_meta, meta_path, read_meta};
pub use store::CollectionStore;
