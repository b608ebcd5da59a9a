//! Pipeline State Tracer
//!
//! A [`Tracer`] accumulates every (variant, state) tuple the application
//! renders with while it is in the `Tracing` state.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──begin_trace──▶ Tracing ──end_trace──▶ Finalized
//! ```
//!
//! [`Tracer::record`] runs on the render submission path: it never logs and
//! never performs I/O. Tuples submitted outside `Tracing` are rejected and
//! reported only through the returned [`RecordOutcome`]. Transitions called
//! from the wrong state are no-ops.
//!
//! Persistence ([`Tracer::send_to_editor`]) can run any number of times; each
//! call overwrites the destination with the current snapshot.

use std::path::PathBuf;

use gfxstate_core::errors::Result;
use gfxstate_core::{Collection, StateRecord, VariantRecord};
use gfxstate_io::CollectionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    Idle,
    Tracing,
    Finalized,
}

/// Result of submitting one tuple to a tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The tuple was new and has been appended.
    Added,
    /// An identical tuple is already stored.
    Duplicate,
    /// The tracer is not in the `Tracing` state.
    Rejected,
}

#[derive(Debug)]
pub struct Tracer {
    collection: Collection,
    state: TraceState,
    output_name: String,
}

impl Tracer {
    /// Wraps `collection` (empty or previously traced) in an idle tracer that
    /// will persist under `output_name`.
    pub fn new(collection: Collection, output_name: impl Into<String>) -> Self {
        Self {
            collection,
            state: TraceState::Idle,
            output_name: output_name.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TraceState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[inline]
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn begin_trace(&mut self) {
        if self.state == TraceState::Idle {
            self.state = TraceState::Tracing;
        }
    }

    pub fn end_trace(&mut self) {
        if self.state == TraceState::Tracing {
            self.state = TraceState::Finalized;
        }
    }

    /// Appends a rendered tuple exactly once.
    #[inline]
    pub fn record(&mut self, variant: &VariantRecord, state: StateRecord) -> RecordOutcome {
        if self.state != TraceState::Tracing {
            return RecordOutcome::Rejected;
        }
        if self.collection.add_state(variant, state) {
            RecordOutcome::Added
        } else {
            RecordOutcome::Duplicate
        }
    }

    /// Persists the current snapshot as `name` inside `store`.
    pub fn send_to_editor(&self, store: &CollectionStore, name: &str) -> Result<PathBuf> {
        let path = store.path_for(name);
        store.save(&self.collection, &path)?;
        Ok(path)
    }

    /// Consumes the tracer, returning the traced collection.
    #[must_use]
    pub fn into_collection(self) -> Collection {
        self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfxstate_core::{GraphicsDeviceType, PassId, PlatformKey, RuntimePlatform};

    fn tracer() -> Tracer {
        Tracer::new(
            Collection::new(PlatformKey::new(
                RuntimePlatform::IPhonePlayer,
                GraphicsDeviceType::Metal,
                "Low",
            )),
            "GfxState_IPhonePlayer_Metal_Low",
        )
    }

    fn tuple() -> (VariantRecord, StateRecord) {
        (
            VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]),
            StateRecord::from_bytes(vec![4, 2]),
        )
    }

    #[test]
    fn test_record_before_begin_is_rejected() {
        let mut t = tracer();
        let (v, s) = tuple();
        assert_eq!(t.record(&v, s), RecordOutcome::Rejected);
        assert!(t.collection().is_empty());
    }

    #[test]
    fn test_identical_tuple_is_stored_once() {
        let mut t = tracer();
        t.begin_trace();
        let (v, s) = tuple();
        assert_eq!(t.record(&v, s.clone()), RecordOutcome::Added);
        assert_eq!(t.record(&v, s), RecordOutcome::Duplicate);
        assert_eq!(t.collection().total_state_count(), 1);
    }

    #[test]
    fn test_finalize_twice_and_append_after_finalize() {
        let mut t = tracer();
        t.begin_trace();
        let (v, s) = tuple();
        t.record(&v, s);
        t.end_trace();
        t.end_trace();
        assert_eq!(t.state(), TraceState::Finalized);

        let late = StateRecord::from_bytes(vec![9]);
        assert_eq!(t.record(&v, late), RecordOutcome::Rejected);
        assert_eq!(t.collection().total_state_count(), 1);

        t.begin_trace();
        assert_eq!(t.state(), TraceState::Finalized);
    }
}
