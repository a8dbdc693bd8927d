use std::path::PathBuf;

use flowchef_cli::commands::{self, App};
use serde_json::json;

fn write_json(dir: &std::path::Path, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn pasta_output() -> serde_json::Value {
    json!({
        "title": "Garlic Butter Pasta",
        "servings": "4",
        "flowGroups": [
            { "parallel": true, "steps": [
                { "stepNumber": 1, "type": "prep", "instruction": "Mince garlic", "ingredients": ["garlic"], "timerMinutes": 0 },
                { "stepNumber": 2, "type": "cook", "instruction": "Boil pasta", "ingredients": ["spaghetti"], "timerMinutes": 10 }
            ]}
        ]
    })
}

#[test]
fn save_list_show_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(dir.path().join("data"));
    let file = write_json(dir.path(), "pasta.json", pasta_output());

    let saved = commands::save(&mut app, &file).unwrap();
    assert_eq!(saved.slug.as_deref(), Some("garlic-butter-pasta"));
    assert_eq!(commands::list(&app).len(), 1);
    assert_eq!(commands::show(&app, "garlic-butter-pasta").unwrap().title, "Garlic Butter Pasta");

    commands::delete(&mut app, "garlic-butter-pasta").unwrap();
    assert!(commands::list(&app).is_empty());
    assert!(commands::delete(&mut app, "garlic-butter-pasta").is_err());
}

#[test]
fn save_rejects_invalid_recipe_with_reasons() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(dir.path().join("data"));
    let file = write_json(dir.path(), "bad.json", json!({ "title": "" }));

    let err = commands::save(&mut app, &file).unwrap_err().to_string();
    assert!(err.contains("title: must not be empty"));
    assert!(err.contains("flowGroups: missing"));
}

#[test]
fn update_applies_patch_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(dir.path().join("data"));
    commands::save(&mut app, &write_json(dir.path(), "p.json", pasta_output())).unwrap();
    let patch = write_json(dir.path(), "patch.json", json!({ "measureSystem": "imperial" }));

    let updated = commands::update(&mut app, "garlic-butter-pasta", &patch).unwrap();
    assert_eq!(updated.measure_system.as_deref(), Some("imperial"));
    assert!(commands::update(&mut app, "missing", &patch).is_err());
}

#[test]
fn html_export_moves_between_devices() {
    let dir = tempfile::tempdir().unwrap();
    let mut laptop = App::open(dir.path().join("laptop"));
    commands::save(&mut laptop, &write_json(dir.path(), "p.json", pasta_output())).unwrap();
    let page = commands::export(&laptop, "garlic-butter-pasta", &dir.path().join("out")).unwrap();
    assert!(page.ends_with("garlic-butter-pasta.html"));

    let mut phone = App::open(dir.path().join("phone"));
    let preview = commands::import(&mut phone, &[page.clone()], true).unwrap();
    assert_eq!(preview.summary.added.len(), 1);
    assert!(commands::list(&phone).is_empty());

    let report = commands::import(&mut phone, &[page.clone()], false).unwrap();
    assert_eq!(report.summary.added.len(), 1);
    assert_eq!(
        commands::show(&phone, "garlic-butter-pasta").unwrap(),
        commands::show(&laptop, "garlic-butter-pasta").unwrap()
    );

    // same file again: equal timestamps, local copy kept
    let again = commands::import(&mut phone, &[page], false).unwrap();
    assert_eq!(again.summary.skipped.len(), 1);
}

#[test]
fn archive_round_trip_and_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = App::open(dir.path().join("source"));
    commands::save(&mut source, &write_json(dir.path(), "a.json", pasta_output())).unwrap();
    commands::save(
        &mut source,
        &write_json(dir.path(), "b.json", json!({ "title": "Iced Tea", "flowGroups": [] })),
    )
    .unwrap();

    let (zip_path, names) = commands::export_all(&source, &dir.path().join("out")).unwrap();
    assert_eq!(names.len(), 2);
    assert!(
        zip_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("recipes-export-")
    );

    let junk = dir.path().join("junk.html");
    std::fs::write(&junk, "<html>not a recipe</html>").unwrap();

    let mut target = App::open(dir.path().join("target"));
    let report = commands::import(&mut target, &[zip_path, junk], false).unwrap();
    assert_eq!(report.summary.added.len(), 2);
    assert_eq!(report.unreadable.len(), 1);
    assert_eq!(commands::list(&target).len(), 2);
}

#[test]
fn dry_run_import_saves_nothing_and_says_so() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = App::open(dir.path().join("source"));
    commands::save(&mut source, &write_json(dir.path(), "a.json", pasta_output())).unwrap();
    let page = commands::export(&source, "garlic-butter-pasta", &dir.path().join("out")).unwrap();

    let mut target = App::open(dir.path().join("target"));
    let report = commands::import(&mut target, &[page], true).unwrap();
    assert!(commands::list(&target).is_empty());

    let buckets = report.buckets(true);
    let labels: Vec<_> = buckets.iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["would add", "would update", "would skip"]);
    assert_eq!(buckets[0].1.len(), 1);
    assert_eq!(report.buckets(false)[0].0, "added");
}

#[test]
fn preferences_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(dir.path());

    commands::set_pref(&mut app, "measure-system", "imperial").unwrap();
    assert!(commands::set_pref(&mut app, "servings", "lots").is_err());
    assert!(commands::set_pref(&mut app, "no-such-pref", "x").is_err());

    let prefs = commands::prefs(&app).unwrap();
    let measure = prefs
        .iter()
        .find(|(p, _)| p.name() == "measure-system")
        .unwrap();
    assert_eq!(measure.1.as_deref(), Some("imperial"));
}
