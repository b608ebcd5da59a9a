//! # gfxstate editor
//!
//! Edit-time and build-time tooling for graphics state collections:
//! combining selected collections into one, and stripping collections of
//! other platforms out of a build for its duration.

pub mod combine;
pub mod commands;
pub mod relocation;
pub mod strip;

pub use combine::{MergeReport, Merger, SkippedSource, SourceCollection, combine};
pub use commands::{EditorCommands, Selection};
pub use relocation::{Relocation, RelocationPlan, resolve_path};
pub use strip::{
    BuildReport, BuildResult, BuildStripper, RestoreSummary, StripSettings, StripSummary,
    StrippedFile, StripperState,
};
