//! Collection Combining Tests
//!
//! Tests for:
//! - File-backed combining (counts, source deletion, sidecars)
//! - Idempotence when the same content is combined twice
//! - Skipping sources captured for a different platform key
//! - Editor command surface (enablement, destination choice, list refresh)

use std::fs;
use std::path::PathBuf;

use gfxstate::io::meta_path;
use gfxstate::runtime::CollectionIndex;
use gfxstate::{
    Collection, CollectionStore, EditorCommands, GraphicsDeviceType, Merger, PassId, PlatformKey,
    RuntimePlatform, Selection, StateRecord, VariantRecord,
};

fn windows_high() -> PlatformKey {
    PlatformKey::new(
        RuntimePlatform::WindowsPlayer,
        GraphicsDeviceType::Direct3D11,
        "High",
    )
}

fn lit() -> VariantRecord {
    VariantRecord::new("Lit", PassId::new(0, 0), ["_FOG"])
}

fn shadow() -> VariantRecord {
    VariantRecord::new("Lit", PassId::new(0, 1), Vec::<&str>::new())
}

fn unlit() -> VariantRecord {
    VariantRecord::new("Unlit", PassId::new(0, 0), ["_ALPHATEST"])
}

fn state(tag: u8) -> StateRecord {
    StateRecord::from_bytes(vec![tag, tag.wrapping_mul(3), 0xA5])
}

/// A: 2 variants, 3 states.
fn collection_a() -> Collection {
    let mut c = Collection::new(windows_high());
    c.add_state(&lit(), state(1));
    c.add_state(&lit(), state(2));
    c.add_state(&shadow(), state(3));
    c
}

/// B: overlaps A on `lit` (one known state, one new), adds `unlit` with 2 states.
fn collection_b() -> Collection {
    let mut c = Collection::new(windows_high());
    c.add_state(&lit(), state(1));
    c.add_state(&lit(), state(4));
    c.add_state(&unlit(), state(5));
    c.add_state(&unlit(), state(6));
    c
}

fn save(store: &CollectionStore, name: &str, collection: &Collection) -> PathBuf {
    let path = store.path_for(name);
    store.save(collection, &path).unwrap();
    path
}

fn setup() -> (tempfile::TempDir, CollectionStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CollectionStore::new(dir.path().join("Collections"));
    (dir, store)
}

// ============================================================================
// Merger
// ============================================================================

#[test]
fn combine_adds_new_content_and_consumes_source() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());

    let report = Merger::new(&store).combine_files(&a, &[b.clone()]).unwrap();
    assert_eq!(report.added_variants, 1);
    assert_eq!(report.added_states, 3);
    assert_eq!(report.combined, vec![b.clone()]);
    assert!(report.skipped.is_empty());

    let merged = store.load(&a).unwrap();
    assert_eq!(merged.variant_count(), 3);
    assert_eq!(merged.total_state_count(), 6);
    assert_eq!(merged.states_for(&lit()).unwrap().len(), 3);

    assert!(!b.exists());
    assert!(!meta_path(&b).exists());
    assert!(meta_path(&a).exists());
}

#[test]
fn combine_is_idempotent_for_identical_content() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());
    let b_copy = store.path_for("B_copy");
    fs::copy(&b, &b_copy).unwrap();

    let merger = Merger::new(&store);
    merger.combine_files(&a, &[b]).unwrap();
    let after_first = fs::read(&a).unwrap();

    let second = merger.combine_files(&a, &[b_copy.clone()]).unwrap();
    assert_eq!(second.added_variants, 0);
    assert_eq!(second.added_states, 0);
    assert_eq!(fs::read(&a).unwrap(), after_first);
    assert!(!b_copy.exists());
}

#[test]
fn combine_skips_mismatched_platform_and_keeps_its_file() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());

    let mut vulkan = Collection::new(PlatformKey::new(
        RuntimePlatform::WindowsPlayer,
        GraphicsDeviceType::Vulkan,
        "High",
    ));
    for (variant, state) in collection_b().pairs() {
        vulkan.add_state(variant, state.clone());
    }
    let b = save(&store, "B", &vulkan);
    let before = store.load(&a).unwrap();

    let report = Merger::new(&store).combine_files(&a, &[b.clone()]).unwrap();
    assert!(report.combined.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, b);
    assert_eq!(report.skipped[0].mismatches.0.len(), 1);
    assert_eq!(report.skipped[0].mismatches.0[0].found, "Vulkan");

    let after = store.load(&a).unwrap();
    assert!(before.pairs().eq(after.pairs()));
    assert!(b.exists());
}

#[test]
fn combine_ignores_destination_listed_as_source() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());

    let report = Merger::new(&store).combine_files(&a, &[a.clone()]).unwrap();
    assert!(report.combined.is_empty());
    assert!(a.exists());
}

#[test]
fn combine_ignores_aliased_destination() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let alias = store.root().join("../Collections/A.gfxstate");
    assert_ne!(alias, a);

    let report = Merger::new(&store).combine_files(&a, &[alias]).unwrap();
    assert!(report.combined.is_empty());
    assert!(a.exists());
    assert!(meta_path(&a).exists());
    assert_eq!(store.load(&a).unwrap().total_state_count(), 3);
}

#[test]
fn combine_merges_repeated_source_once() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());
    let b_alias = store.root().join("../Collections/B.gfxstate");

    let report = Merger::new(&store)
        .combine_files(&a, &[b.clone(), b.clone(), b_alias])
        .unwrap();
    assert_eq!(report.combined, vec![b.clone()]);
    assert_eq!(report.added_states, 3);
    assert!(!b.exists());
    assert_eq!(store.load(&a).unwrap().total_state_count(), 6);
}

#[test]
fn combine_with_corrupt_source_changes_nothing() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());
    let broken = store.path_for("Broken");
    fs::write(&broken, b"garbage\n").unwrap();
    let before = fs::read(&a).unwrap();

    assert!(
        Merger::new(&store)
            .combine_files(&a, &[b.clone(), broken])
            .is_err()
    );
    assert_eq!(fs::read(&a).unwrap(), before);
    assert!(b.exists());
}

// ============================================================================
// Editor Commands
// ============================================================================

#[test]
fn combine_command_requires_two_collections() {
    let one = Selection::new(vec![PathBuf::from("A.gfxstate"), PathBuf::from("notes.txt")]);
    assert!(!EditorCommands::can_combine(&one));

    let two = Selection::new(vec![PathBuf::from("A.gfxstate"), PathBuf::from("B.gfxstate")]);
    assert!(EditorCommands::can_combine(&two));
}

#[test]
fn combine_command_uses_active_selection_as_destination() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());
    let commands = EditorCommands::new(store);

    let selection = Selection::new(vec![a.clone(), b.clone()]).with_active(&b);
    let report = commands.combine_selected(&selection).unwrap().unwrap();

    assert_eq!(report.combined, vec![a.clone()]);
    assert!(!a.exists());
    let merged = commands.store().load(&b).unwrap();
    assert_eq!(merged.total_state_count(), 6);
}

#[test]
fn combine_command_defaults_to_first_selected() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let b = save(&store, "B", &collection_b());
    let commands = EditorCommands::new(store);

    let selection = Selection::new(vec![a.clone(), b.clone()]).with_active("readme.txt");
    commands.combine_selected(&selection).unwrap();

    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn combine_command_with_single_collection_is_noop() {
    let (_dir, store) = setup();
    let a = save(&store, "A", &collection_a());
    let commands = EditorCommands::new(store);

    let report = commands.combine_selected(&Selection::new(vec![a.clone()])).unwrap();
    assert!(report.is_none());
    assert!(a.exists());
}

#[test]
fn update_collection_list_rescans_folder() {
    let (_dir, store) = setup();
    save(&store, "A", &collection_a());
    let commands = EditorCommands::new(store.clone());
    let mut index = CollectionIndex::new(store.clone());

    assert_eq!(commands.update_collection_list(&mut index).unwrap(), 1);

    save(&store, "Nested/B", &collection_b());
    assert_eq!(commands.update_collection_list(&mut index).unwrap(), 2);
    assert!(index.find_entry(&windows_high()).is_some());
}
