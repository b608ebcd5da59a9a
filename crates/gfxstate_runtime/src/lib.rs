//! # gfxstate runtime
//!
//! Runtime side of graphics state collections: the [`CollectionIndex`] that
//! resolves the collection for the running environment, the [`Tracer`] that
//! records pipeline states, the [`WarmUpRunner`] that replays them, and the
//! [`StateCollectionService`] that ties them to application lifecycle events.

pub mod index;
pub mod session;
pub mod settings;
pub mod tracer;
pub mod warmup;

pub use index::{CollectionIndex, IndexEntry};
pub use session::{Session, SharedService, StateCollectionService};
pub use settings::{Environment, RuntimeSettings, TraceMode};
pub use tracer::{RecordOutcome, TraceState, Tracer};
pub use warmup::{PipelineWarmer, WarmUpReport, WarmUpRunner};
