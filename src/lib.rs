#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # gfxstate
//!
//! Records the graphics pipeline states an application actually uses, replays
//! them at startup so the driver compiles them before the first frame needs
//! them, and keeps the recorded collections tidy at edit and build time.
//!
//! The work is split across four crates re-exported here:
//!
//! - [`core`]: platform keys, variants, state records and collections
//! - [`io`]: the collection file format, sidecars and discovery
//! - [`runtime`]: tracing, warm-up and the [`StateCollectionService`]
//! - [`editor`]: combining collections and stripping them around a build
//!
//! # Example
//!
//! ```rust,ignore
//! use gfxstate::prelude::*;
//!
//! let env = Environment::new(RuntimePlatform::Android, GraphicsDeviceType::Vulkan, "High");
//! let mut service = StateCollectionService::new(RuntimeSettings::default(), env, project_root);
//! service.start()?;
//! service.record(&variant, state);
//! service.on_destroy()?;
//! ```

pub use gfxstate_core as core;
pub use gfxstate_editor as editor;
pub use gfxstate_io as io;
pub use gfxstate_runtime as runtime;

pub use gfxstate_core::interner;
pub use gfxstate_core::{
    BuildTarget, Collection, GfxStateError, GraphicsDeviceType, GraphicsStateDesc, KeyMismatch,
    KeyMismatches, KeywordSet, MergeStats, PassId, PlatformKey, Result, RuntimePlatform, ShaderId,
    StateRecord, VariantRecord,
};
pub use gfxstate_editor::{
    BuildReport, BuildResult, BuildStripper, EditorCommands, MergeReport, Merger, Selection,
    StripSettings,
};
pub use gfxstate_io::CollectionStore;
pub use gfxstate_runtime::{
    CollectionIndex, Environment, PipelineWarmer, RuntimeSettings, Session, SharedService,
    StateCollectionService, TraceMode, Tracer, WarmUpRunner,
};

/// The types most applications need.
pub mod prelude {
    pub use crate::{
        BuildReport, BuildStripper, BuildTarget, Collection, CollectionStore, EditorCommands,
        Environment, GraphicsDeviceType, GraphicsStateDesc, PassId, PipelineWarmer, PlatformKey,
        RuntimePlatform, RuntimeSettings, Selection, StateCollectionService, StateRecord,
        TraceMode, VariantRecord,
    };
}
