//! Graphics State Collections
//!
//! A [`Collection`] is the persisted unit: every shader variant encountered on
//! one platform, each with the pipeline states it was drawn with.
//!
//! # Storage Layout
//!
//! Variants live in a contiguous `Vec<VariantEntry>` in insertion order and
//! are found through an `FxHashMap<VariantRecord, usize>`. Each entry keeps its
//! states in insertion order plus an `FxHashSet` for content deduplication.
//! Insertion order is preserved so that a saved collection is stable across
//! load/save cycles.
//!
//! Collections are append-only: there is no API to remove a variant or a
//! state, and the platform key is fixed at construction.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::platform::{KeyMismatches, PlatformKey};
use crate::state::StateRecord;
use crate::variant::VariantRecord;

/// A variant together with the states attached to it.
#[derive(Debug, Clone)]
pub struct VariantEntry {
    variant: VariantRecord,
    states: Vec<StateRecord>,
    state_set: FxHashSet<StateRecord>,
}

impl VariantEntry {
    fn new(variant: VariantRecord) -> Self {
        Self {
            variant,
            states: Vec::new(),
            state_set: FxHashSet::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn variant(&self) -> &VariantRecord {
        &self.variant
    }

    #[inline]
    #[must_use]
    pub fn states(&self) -> &[StateRecord] {
        &self.states
    }

    fn insert_state(&mut self, state: StateRecord) -> bool {
        if self.state_set.contains(&state) {
            return false;
        }
        self.state_set.insert(state.clone());
        self.states.push(state);
        true
    }
}

/// Number of records a merge added to its destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added_variants: usize,
    pub added_states: usize,
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.added_variants += rhs.added_variants;
        self.added_states += rhs.added_states;
    }
}

/// An aggregate of variants and their states for one [`PlatformKey`].
#[derive(Debug, Clone)]
pub struct Collection {
    key: PlatformKey,
    entries: Vec<VariantEntry>,
    lookup: FxHashMap<VariantRecord, usize>,
    total_states: usize,
}

impl Collection {
    #[must_use]
    pub fn new(key: PlatformKey) -> Self {
        Self {
            key,
            entries: Vec::new(),
            lookup: FxHashMap::default(),
            total_states: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &PlatformKey {
        &self.key
    }

    #[inline]
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of states across all variants.
    #[inline]
    #[must_use]
    pub fn total_state_count(&self) -> usize {
        self.total_states
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_variant(&self, variant: &VariantRecord) -> bool {
        self.lookup.contains_key(variant)
    }

    /// States attached to `variant`, or `None` if the variant is unknown.
    #[must_use]
    pub fn states_for(&self, variant: &VariantRecord) -> Option<&[StateRecord]> {
        self.lookup
            .get(variant)
            .map(|&idx| self.entries[idx].states())
    }

    /// Adds a variant. Returns `false` if an equal variant already exists.
    pub fn add_variant(&mut self, variant: VariantRecord) -> bool {
        if self.lookup.contains_key(&variant) {
            return false;
        }
        self.insert_entry(variant);
        true
    }

    /// Adds a state under `variant`, creating the variant if needed.
    ///
    /// Returns `false` if an equal state is already attached to the variant.
    pub fn add_state(&mut self, variant: &VariantRecord, state: StateRecord) -> bool {
        let idx = match self.lookup.get(variant).copied() {
            Some(idx) => idx,
            None => self.insert_entry(variant.clone()),
        };
        let added = self.entries[idx].insert_state(state);
        if added {
            self.total_states += 1;
        }
        added
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &VariantEntry> + '_ {
        self.entries.iter()
    }

    pub fn variants(&self) -> impl ExactSizeIterator<Item = &VariantRecord> + '_ {
        self.entries.iter().map(VariantEntry::variant)
    }

    /// Every stored (variant, state) pair, exactly once.
    pub fn pairs(&self) -> impl Iterator<Item = (&VariantRecord, &StateRecord)> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.states.iter().map(move |state| (&entry.variant, state)))
    }

    /// Folds every variant and state of `source` into this collection.
    ///
    /// Fails without touching `self` if the platform keys differ.
    pub fn merge_from(
        &mut self,
        source: &Collection,
    ) -> std::result::Result<MergeStats, KeyMismatches> {
        let mismatches = self.key.mismatches(&source.key);
        if !mismatches.is_empty() {
            return Err(KeyMismatches(mismatches));
        }

        let mut stats = MergeStats::default();
        for entry in &source.entries {
            if self.add_variant(entry.variant.clone()) {
                stats.added_variants += 1;
            }
            for state in &entry.states {
                if self.add_state(&entry.variant, state.clone()) {
                    stats.added_states += 1;
                }
            }
        }
        Ok(stats)
    }

    fn insert_entry(&mut self, variant: VariantRecord) -> usize {
        let idx = self.entries.len();
        self.lookup.insert(variant.clone(), idx);
        self.entries.push(VariantEntry::new(variant));
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{GraphicsDeviceType, RuntimePlatform};
    use crate::variant::PassId;

    fn key() -> PlatformKey {
        PlatformKey::new(
            RuntimePlatform::WindowsPlayer,
            GraphicsDeviceType::Direct3D11,
            "High",
        )
    }

    #[test]
    fn test_add_variant_is_idempotent() {
        let mut c = Collection::new(key());
        let v = VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]);
        assert!(c.add_variant(v.clone()));
        assert!(!c.add_variant(v));
        assert_eq!(c.variant_count(), 1);
    }

    #[test]
    fn test_add_state_dedupes_by_content() {
        let mut c = Collection::new(key());
        let v = VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]);
        assert!(c.add_state(&v, StateRecord::from_bytes(vec![1])));
        assert!(!c.add_state(&v, StateRecord::from_bytes(vec![1])));
        assert!(c.add_state(&v, StateRecord::from_bytes(vec![2])));
        assert_eq!(c.variant_count(), 1);
        assert_eq!(c.total_state_count(), 2);
        assert_eq!(c.states_for(&v).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_pairs_visits_every_state_once() {
        let mut c = Collection::new(key());
        let a = VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]);
        let b = VariantRecord::new("Unlit", PassId::new(0, 0), Vec::<&str>::new());
        c.add_state(&a, StateRecord::from_bytes(vec![1]));
        c.add_state(&a, StateRecord::from_bytes(vec![2]));
        c.add_state(&b, StateRecord::from_bytes(vec![1]));
        c.add_variant(VariantRecord::new("Empty", PassId::new(1, 0), ["_X"]));

        assert_eq!(c.pairs().count(), 3);
        assert_eq!(c.variant_count(), 3);
    }

    #[test]
    fn test_merge_from_rejects_other_key() {
        let mut dst = Collection::new(key());
        let mut src = Collection::new(PlatformKey::new(
            RuntimePlatform::Android,
            GraphicsDeviceType::Vulkan,
            "High",
        ));
        src.add_state(
            &VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"]),
            StateRecord::from_bytes(vec![1]),
        );

        let KeyMismatches(list) = dst.merge_from(&src).unwrap_err();
        assert_eq!(list.len(), 2);
        assert!(dst.is_empty());
    }
}
