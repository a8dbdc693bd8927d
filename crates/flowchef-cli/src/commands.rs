//! Command implementations behind the `flowchef` binary.
//!
//! Each command returns data; printing is left to `main`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use flowchef_core::models::{Recipe, RecipePatch};
use flowchef_core::validate::recipe_from_json;
use flowchef_export::archive::{archive_filename_today, export_archive, read_archive};
use flowchef_export::{decode_recipe_html, generate_export_filename, generate_recipe_html};
use flowchef_storage::preferences::{self, Preference};
use flowchef_storage::{FileStore, ImportSummary, RecipeStore};
use tracing::{info, warn};

/// The recipe store opened over a data directory.
pub struct App {
    pub recipes: RecipeStore<FileStore>,
}

impl App {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            recipes: RecipeStore::new(FileStore::new(data_dir)),
        }
    }
}

pub fn list(app: &App) -> Vec<Recipe> {
    app.recipes.get_saved_recipes()
}

pub fn show(app: &App, slug: &str) -> Result<Recipe> {
    app.recipes
        .get_recipe_by_slug(slug)
        .ok_or_else(|| eyre!("no recipe with slug {slug:?}"))
}

/// Save a recipe JSON file (a full recipe or bare model output).
pub fn save(app: &mut App, path: &Path) -> Result<Recipe> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let recipe = recipe_from_json(&contents)
        .map_err(|e| eyre!("{} is not a valid recipe: {e}", path.display()))?;
    Ok(app.recipes.save_recipe(recipe)?)
}

pub fn update(app: &mut App, slug: &str, patch_path: &Path) -> Result<Recipe> {
    let contents = std::fs::read_to_string(patch_path)
        .wrap_err_with(|| format!("failed to read {}", patch_path.display()))?;
    let patch: RecipePatch = serde_json::from_str(&contents)
        .wrap_err_with(|| format!("{} is not a valid patch", patch_path.display()))?;
    app.recipes
        .update_recipe(slug, patch)?
        .ok_or_else(|| eyre!("no recipe with slug {slug:?}"))
}

pub fn delete(app: &mut App, slug: &str) -> Result<()> {
    if !app.recipes.delete_recipe(slug)? {
        return Err(eyre!("no recipe with slug {slug:?}"));
    }
    Ok(())
}

/// Write one recipe as `<slug>.html` into `out_dir`. Returns the file path.
pub fn export(app: &App, slug: &str, out_dir: &Path) -> Result<PathBuf> {
    let recipe = show(app, slug)?;
    let html = generate_recipe_html(&recipe)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(generate_export_filename(&recipe));
    std::fs::write(&path, html)?;
    info!(path = %path.display(), "recipe exported");
    Ok(path)
}

/// Write every saved recipe into a dated zip in `out_dir`.
/// Returns the archive path and its entry names.
pub fn export_all(app: &App, out_dir: &Path) -> Result<(PathBuf, Vec<String>)> {
    let recipes = app.recipes.get_saved_recipes();
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(archive_filename_today());
    let file = BufWriter::new(File::create(&path)?);
    let (mut writer, names) = export_archive(&recipes, file)?;
    writer.flush()?;
    Ok((path, names))
}

/// A file (or archive entry) that could not be imported.
#[derive(Debug, Clone)]
pub struct Unreadable {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub unreadable: Vec<Unreadable>,
}

impl ImportReport {
    /// The three outcome buckets with their labels, worded for a dry run
    /// when nothing was saved.
    pub fn buckets(&self, dry_run: bool) -> [(&'static str, &[Recipe]); 3] {
        let [added, updated, skipped] = if dry_run {
            ["would add", "would update", "would skip"]
        } else {
            ["added", "updated", "skipped"]
        };
        [
            (added, self.summary.added.as_slice()),
            (updated, self.summary.updated.as_slice()),
            (skipped, self.summary.skipped.as_slice()),
        ]
    }
}

/// Import `.html` pages and `.zip` archives.
///
/// With `dry_run`, storage is left untouched and the summary is what a real
/// import would do.
pub fn import(app: &mut App, paths: &[PathBuf], dry_run: bool) -> Result<ImportReport> {
    let mut recipes = Vec::new();
    let mut unreadable = Vec::new();

    for path in paths {
        let source = path.display().to_string();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

        if is_zip {
            match File::open(path).map_err(eyre::Report::from).and_then(|f| {
                read_archive(BufReader::new(f)).map_err(eyre::Report::from)
            }) {
                Ok(archive) => {
                    recipes.extend(archive.recipes);
                    unreadable.extend(archive.rejected.into_iter().map(|r| Unreadable {
                        source: format!("{source}:{}", r.name),
                        reason: r.reason,
                    }));
                }
                Err(e) => unreadable.push(Unreadable {
                    source,
                    reason: e.to_string(),
                }),
            }
            continue;
        }

        let decoded = std::fs::read_to_string(path)
            .map_err(eyre::Report::from)
            .and_then(|html| decode_recipe_html(&html).map_err(eyre::Report::from));
        match decoded {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => {
                warn!(file = %source, error = %e, "skipping unreadable import file");
                unreadable.push(Unreadable {
                    source,
                    reason: e.to_string(),
                });
            }
        }
    }

    let summary = if dry_run {
        app.recipes.preview_import(&recipes)
    } else {
        app.recipes.import_recipes(recipes)?
    };

    Ok(ImportReport {
        summary,
        unreadable,
    })
}

/// Every preference with its current (or default) value.
pub fn prefs(app: &App) -> Result<Vec<(Preference, Option<String>)>> {
    Preference::ALL
        .into_iter()
        .map(|p| -> Result<_> { Ok((p, preferences::get_preference(app.recipes.store(), p)?)) })
        .collect()
}

pub fn set_pref(app: &mut App, name: &str, value: &str) -> Result<()> {
    let pref: Preference = name.parse()?;
    preferences::set_preference(app.recipes.store_mut(), pref, value)?;
    Ok(())
}
