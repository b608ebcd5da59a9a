//! Pipeline Warm-up
//!
//! A [`WarmUpRunner`] replays every stored (variant, state) pair of a
//! collection into the host's pipeline-object cache through the
//! [`PipelineWarmer`] trait. Warm-up is best-effort: a pair that fails is
//! logged and counted, and the remaining pairs are still submitted.

use std::sync::Arc;

use gfxstate_core::errors::Result;
use gfxstate_core::{Collection, StateRecord, VariantRecord};

/// The host pipeline cache that pre-compiles pipeline objects.
pub trait PipelineWarmer {
    fn warm(&mut self, variant: &VariantRecord, state: &StateRecord) -> Result<()>;
}

impl<F> PipelineWarmer for F
where
    F: FnMut(&VariantRecord, &StateRecord) -> Result<()>,
{
    fn warm(&mut self, variant: &VariantRecord, state: &StateRecord) -> Result<()> {
        self(variant, state)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmUpReport {
    /// Pairs handed to the warmer.
    pub submitted: usize,
    /// Pairs the warmer reported as failed.
    pub failed: usize,
}

impl WarmUpReport {
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.submitted - self.failed
    }
}

/// Warm-up over a shared, read-only collection snapshot.
#[derive(Debug, Clone)]
pub struct WarmUpRunner {
    collection: Arc<Collection>,
}

impl WarmUpRunner {
    #[must_use]
    pub fn new(collection: impl Into<Arc<Collection>>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }

    /// Submits every stored pair exactly once.
    pub fn warm_up(&self, warmer: &mut impl PipelineWarmer) -> WarmUpReport {
        let mut report = WarmUpReport::default();
        for (variant, state) in self.collection.pairs() {
            report.submitted += 1;
            if let Err(e) = warmer.warm(variant, state) {
                report.failed += 1;
                log::warn!("Failed to warm up {variant}: {e}");
            }
        }
        if report.failed > 0 {
            log::warn!(
                "Warm-up finished with {} of {} GraphicsState entries failed",
                report.failed,
                report.submitted
            );
        }
        report
    }
}
