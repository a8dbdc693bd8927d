use flowchef_core::models::{FlowGroup, Recipe};
use flowchef_core::time::EPOCH;
use flowchef_storage::import::reconcile;
use flowchef_storage::{FixedClock, ImportOutcome, MemoryStore, RecipeStore};
use jiff::Timestamp;

fn dated(slug: &str, title: &str, saved_at: Option<&str>) -> Recipe {
    let mut r = Recipe::new(title, vec![FlowGroup::new(false, vec![])]);
    r.slug = Some(slug.to_string());
    r.saved_at = saved_at.map(str::to_string);
    r
}

const T1: &str = "2024-05-01T12:00:00.000Z";
const EARLIER: &str = "2024-04-01T12:00:00.000Z";
const LATER: &str = "2024-06-01T12:00:00.000Z";

/// A store holding the given recipes exactly as written, timestamps intact.
fn seeded(recipes: Vec<Recipe>) -> RecipeStore<MemoryStore, FixedClock> {
    let mut store = RecipeStore::with_clock(
        MemoryStore::new(),
        FixedClock(Timestamp::from_second(1_800_000_000).unwrap()),
    );
    for r in recipes {
        assert_eq!(store.import_recipe(r).unwrap(), ImportOutcome::Added);
    }
    store
}

#[test]
fn newer_import_replaces_local() {
    let mut store = seeded(vec![dated("s", "Local", Some(T1))]);
    let outcome = store.import_recipe(dated("s", "Imported", Some(LATER))).unwrap();

    assert_eq!(outcome, ImportOutcome::Updated);
    let stored = store.get_recipe_by_slug("s").unwrap();
    assert_eq!(stored.title, "Imported");
    assert_eq!(stored.saved_at.as_deref(), Some(LATER));
}

#[test]
fn older_import_is_skipped() {
    let mut store = seeded(vec![dated("s", "Local", Some(T1))]);
    let outcome = store.import_recipe(dated("s", "Imported", Some(EARLIER))).unwrap();

    assert_eq!(outcome, ImportOutcome::Skipped);
    assert_eq!(store.get_recipe_by_slug("s").unwrap().title, "Local");
}

#[test]
fn equal_timestamps_keep_local() {
    let mut store = seeded(vec![dated("s", "Local", Some(T1))]);
    let outcome = store.import_recipe(dated("s", "Imported", Some(T1))).unwrap();

    assert_eq!(outcome, ImportOutcome::Skipped);
    assert_eq!(store.get_recipe_by_slug("s").unwrap().title, "Local");
}

#[test]
fn equal_instants_in_different_offsets_tie() {
    let mut store = seeded(vec![dated("s", "Local", Some("2024-05-01T12:00:00Z"))]);
    let outcome = store
        .import_recipe(dated("s", "Imported", Some("2024-05-01T14:00:00+02:00")))
        .unwrap();
    assert_eq!(outcome, ImportOutcome::Skipped);
}

#[test]
fn missing_timestamp_loses_against_real_date() {
    let mut store = seeded(vec![dated("s", "Local", Some(EARLIER))]);
    let outcome = store.import_recipe(dated("s", "Imported", None)).unwrap();
    assert_eq!(outcome, ImportOutcome::Skipped);
}

#[test]
fn missing_timestamp_into_empty_storage_is_added_at_epoch() {
    let mut store = RecipeStore::new(MemoryStore::new());
    let outcome = store.import_recipe(dated("s", "Imported", None)).unwrap();

    assert_eq!(outcome, ImportOutcome::Added);
    assert_eq!(store.get_recipe_by_slug("s").unwrap().saved_at.as_deref(), Some(EPOCH));
}

#[test]
fn unparseable_timestamp_counts_as_epoch() {
    let mut store = seeded(vec![dated("s", "Local", Some("not a date"))]);
    let outcome = store.import_recipe(dated("s", "Imported", Some(EARLIER))).unwrap();
    assert_eq!(outcome, ImportOutcome::Updated);
}

#[test]
fn import_derives_slug_from_title() {
    let mut store = RecipeStore::new(MemoryStore::new());
    let mut r = dated("", "Garlic Butter Pasta", Some(T1));
    r.slug = None;
    store.import_recipe(r).unwrap();
    assert!(store.get_recipe_by_slug("garlic-butter-pasta").is_some());
}

#[test]
fn batch_buckets_and_final_contents() {
    let mut store = seeded(vec![
        dated("b", "B local", Some(T1)),
        dated("c", "C local", Some(T1)),
    ]);

    let summary = store
        .import_recipes(vec![
            dated("a", "A new", Some(T1)),
            dated("b", "B older", Some(EARLIER)),
            dated("c", "C newer", Some(LATER)),
        ])
        .unwrap();

    let slugs = |rs: &[Recipe]| rs.iter().map(|r| r.resolved_slug()).collect::<Vec<_>>();
    assert_eq!(slugs(&summary.added), vec!["a"]);
    assert_eq!(slugs(&summary.skipped), vec!["b"]);
    assert_eq!(slugs(&summary.updated), vec!["c"]);

    assert_eq!(store.get_saved_recipes().len(), 3);
    assert_eq!(store.get_recipe_by_slug("a").unwrap().title, "A new");
    assert_eq!(store.get_recipe_by_slug("b").unwrap().title, "B local");
    assert_eq!(store.get_recipe_by_slug("c").unwrap().title, "C newer");
}

#[test]
fn duplicate_slugs_in_one_batch_see_earlier_effects() {
    let mut store = RecipeStore::new(MemoryStore::new());
    let summary = store
        .import_recipes(vec![
            dated("dup", "First", Some(T1)),
            dated("dup", "Second older", Some(EARLIER)),
            dated("dup", "Third newer", Some(LATER)),
        ])
        .unwrap();

    assert_eq!(summary.added.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.updated.len(), 1);
    assert_eq!(store.get_recipe_by_slug("dup").unwrap().title, "Third newer");
}

#[test]
fn preview_matches_import_and_does_not_write() {
    let mut store = seeded(vec![dated("b", "B local", Some(T1))]);
    let batch = vec![
        dated("a", "A", Some(T1)),
        dated("b", "B newer", Some(LATER)),
        dated("a", "A again", Some(T1)),
    ];

    let preview = store.preview_import(&batch);
    assert_eq!(store.get_saved_recipes().len(), 1);
    assert_eq!(store.get_recipe_by_slug("b").unwrap().title, "B local");

    let applied = store.import_recipes(batch).unwrap();
    assert_eq!(preview, applied);
    assert_eq!(applied.added.len(), 1);
    assert_eq!(applied.updated.len(), 1);
    assert_eq!(applied.skipped.len(), 1);
}

#[test]
fn empty_batches_are_empty() {
    let mut store = seeded(vec![dated("x", "X", Some(T1))]);
    assert!(store.preview_import(&[]).is_empty());
    let summary = store.import_recipes(Vec::new()).unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.len(), 0);
}

#[test]
fn reconcile_works_on_a_plain_vec() {
    let mut collection = vec![dated("s", "Local", Some(T1))];
    let (outcome, normalized) = reconcile(&mut collection, dated("t", "Other", None));
    assert_eq!(outcome, ImportOutcome::Added);
    assert_eq!(normalized.saved_at.as_deref(), Some(EPOCH));
    assert_eq!(collection[0].resolved_slug(), "t");
    assert_eq!(collection.len(), 2);
}
