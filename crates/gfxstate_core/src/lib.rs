//! # gfxstate core
//!
//! Data model shared by every gfxstate crate: platform keys, shader variant
//! records, pipeline state records and the collections that aggregate them.

pub mod collection;
pub mod errors;
pub mod interner;
pub mod platform;
pub mod state;
pub mod variant;

pub use collection::{Collection, MergeStats, VariantEntry};
pub use errors::{GfxStateError, Result};
pub use platform::{
    BuildTarget, GraphicsDeviceType, KeyField, KeyMismatch, KeyMismatches, PlatformKey,
    RuntimePlatform,
};
pub use state::{GraphicsStateDesc, StateRecord};
pub use variant::{KeywordSet, PassId, ShaderId, VariantRecord};
