//! Sessions & the collection service
//!
//! [`StateCollectionService`] is the process-scoped object an application
//! root creates once and hands to whatever needs it (render submission,
//! lifecycle callbacks). It owns the [`CollectionIndex`] and the active
//! [`Session`].
//!
//! A session is either tracing or warming up, never both:
//!
//! - [`Session::Tracing`] wraps a [`Tracer`] over the matching collection (or
//!   a fresh one when none matches).
//! - [`Session::WarmUp`] wraps a [`WarmUpRunner`] over a read-only snapshot.
//! - [`Session::Idle`] before `start`, or in warm-up mode with nothing to warm.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use gfxstate_core::errors::Result;
use gfxstate_core::{Collection, StateRecord, VariantRecord};
use gfxstate_io::CollectionStore;

use crate::index::CollectionIndex;
use crate::settings::{Environment, RuntimeSettings, TraceMode};
use crate::tracer::{RecordOutcome, Tracer};
use crate::warmup::{PipelineWarmer, WarmUpReport, WarmUpRunner};

#[derive(Debug, Default)]
pub enum Session {
    #[default]
    Idle,
    Tracing(Tracer),
    WarmUp(WarmUpRunner),
}

/// Shared handle for hosts that drive the service from several callbacks.
pub type SharedService = Arc<RwLock<StateCollectionService>>;

#[derive(Debug)]
pub struct StateCollectionService {
    settings: RuntimeSettings,
    environment: Environment,
    index: CollectionIndex,
    session: Session,
}

impl StateCollectionService {
    /// Creates a service whose store lives at `project_root/collection_folder`.
    pub fn new(
        settings: RuntimeSettings,
        environment: Environment,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        let store = CollectionStore::new(project_root.into().join(&settings.collection_folder));
        Self::with_store(settings, environment, store)
    }

    #[must_use]
    pub fn with_store(
        settings: RuntimeSettings,
        environment: Environment,
        store: CollectionStore,
    ) -> Self {
        Self {
            settings,
            environment,
            index: CollectionIndex::new(store),
            session: Session::Idle,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedService {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &CollectionIndex {
        &self.index
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Rescans the collection folder.
    pub fn update_collection_list(&mut self) -> Result<usize> {
        self.index.rebuild()
    }

    /// Resolves the collection for the current environment and opens the
    /// session selected by the settings.
    pub fn start(&mut self) -> Result<&Session> {
        self.index.rebuild()?;
        let key = self.environment.current_key();

        self.session = match self.settings.mode {
            TraceMode::Tracing => {
                let (collection, output_name) = match self.index.find_entry(&key) {
                    Some(entry) => (
                        self.index.store().load(&entry.path)?,
                        entry.name().to_string(),
                    ),
                    None => (
                        Collection::new(key.clone()),
                        key.default_collection_name(&self.settings.output_prefix),
                    ),
                };
                let mut tracer = Tracer::new(collection, output_name);
                log::info!(
                    "Tracing started for GraphicsStateCollection by Scene '{}'.",
                    self.environment.scene_name
                );
                tracer.begin_trace();
                Session::Tracing(tracer)
            }
            TraceMode::WarmUp => match self.index.find_matching(&key)? {
                Some(collection) => {
                    log::info!(
                        "Scene '{}' started warming up {} GraphicsState entries.",
                        self.environment.scene_name,
                        collection.total_state_count()
                    );
                    Session::WarmUp(WarmUpRunner::new(collection))
                }
                None => {
                    log::info!("No GraphicsStateCollection matches {key}; nothing to warm up.");
                    Session::Idle
                }
            },
        };
        Ok(&self.session)
    }

    /// Forwards a rendered tuple to the tracer; rejected outside tracing.
    #[inline]
    pub fn record(&mut self, variant: &VariantRecord, state: StateRecord) -> RecordOutcome {
        match &mut self.session {
            Session::Tracing(tracer) => tracer.record(variant, state),
            _ => RecordOutcome::Rejected,
        }
    }

    /// Replays the warm-up collection; a no-op report in any other session.
    pub fn warm_up(&self, warmer: &mut impl PipelineWarmer) -> WarmUpReport {
        match &self.session {
            Session::WarmUp(runner) => runner.warm_up(warmer),
            _ => WarmUpReport::default(),
        }
    }

    /// Losing focus persists the trace, since destroy is not guaranteed to
    /// run on mobile platforms.
    pub fn on_focus_changed(&mut self, focused: bool) -> Result<Option<PathBuf>> {
        if focused {
            return Ok(None);
        }
        match &self.session {
            Session::Tracing(tracer) => {
                log::info!(
                    "Focus changed. Sending collection to Editor with {} GraphicsState entries.",
                    tracer.collection().total_state_count()
                );
                tracer
                    .send_to_editor(self.index.store(), tracer.output_name())
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Finalizes the trace and persists it.
    pub fn on_destroy(&mut self) -> Result<Option<PathBuf>> {
        match &mut self.session {
            Session::Tracing(tracer) => {
                tracer.end_trace();
                log::info!(
                    "Sending collection to Editor with {} GraphicsState entries.",
                    tracer.collection().total_state_count()
                );
                tracer
                    .send_to_editor(self.index.store(), tracer.output_name())
                    .map(Some)
            }
            _ => Ok(None),
        }
    }
}
