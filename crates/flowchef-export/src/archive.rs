//! Zip archives of exported recipe pages, for one-shot backup and transfer.

use std::collections::HashSet;
use std::io::{Cursor, Read, Seek, Write};

use flowchef_core::models::Recipe;
use jiff::civil::Date;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::ExportError;
use crate::html::generate_recipe_html;
use crate::parse::decode_recipe_html;

/// `<slug>.html`, with the slug derived from the title when absent.
/// A recipe whose title yields no slug characters is named `recipe.html`.
pub fn generate_export_filename(recipe: &Recipe) -> String {
    let slug = recipe.resolved_slug();
    if slug.is_empty() {
        "recipe.html".to_string()
    } else {
        format!("{slug}.html")
    }
}

/// `recipes-export-YYYY-MM-DD.zip`.
pub fn archive_filename(date: Date) -> String {
    format!("recipes-export-{}.zip", date.strftime("%Y-%m-%d"))
}

/// [`archive_filename`] for today's date in the local time zone.
pub fn archive_filename_today() -> String {
    archive_filename(jiff::Zoned::now().date())
}

/// One export filename per recipe, in order. The first use of a name keeps
/// it; later collisions get `-2`, `-3`, ... before the extension.
pub fn unique_filenames(recipes: &[Recipe]) -> Vec<String> {
    let mut used = HashSet::new();
    recipes
        .iter()
        .map(|recipe| {
            let name = generate_export_filename(recipe);
            if used.insert(name.clone()) {
                return name;
            }
            let stem = name.trim_end_matches(".html");
            let mut n = 2;
            loop {
                let candidate = format!("{stem}-{n}.html");
                if used.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// Write one HTML entry per recipe into a zip written to `writer`.
/// Returns the writer and the entry names used.
pub fn export_archive<W: Write + Seek>(
    recipes: &[Recipe],
    writer: W,
) -> Result<(W, Vec<String>), ExportError> {
    let names = unique_filenames(recipes);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for (recipe, name) in recipes.iter().zip(&names) {
        let html = generate_recipe_html(recipe)?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(html.as_bytes())?;
        debug!(entry = %name, bytes = html.len(), "archived recipe");
    }

    let writer = zip.finish()?;
    info!(entries = names.len(), "recipe archive written");
    Ok((writer, names))
}

/// [`export_archive`] into memory.
pub fn export_archive_bytes(recipes: &[Recipe]) -> Result<Vec<u8>, ExportError> {
    let (cursor, _) = export_archive(recipes, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// An archive entry that could not be read back as a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub name: String,
    pub reason: String,
}

/// Recipes recovered from an archive, in entry order, plus the `.html`
/// entries that did not decode.
#[derive(Debug, Clone, Default)]
pub struct ArchiveImport {
    pub recipes: Vec<Recipe>,
    pub rejected: Vec<RejectedEntry>,
}

/// Read every `.html` entry of a zip archive as an exported recipe page.
///
/// Entries that are not `.html` files are ignored. A bad entry is recorded
/// in [`ArchiveImport::rejected`] and does not stop the rest.
pub fn read_archive<R: Read + Seek>(reader: R) -> Result<ArchiveImport, ExportError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut result = ArchiveImport::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if entry.is_dir() || !name.to_ascii_lowercase().ends_with(".html") {
            continue;
        }

        let mut html = String::new();
        let decoded = entry
            .read_to_string(&mut html)
            .map_err(ExportError::from)
            .and_then(|_| decode_recipe_html(&html));

        match decoded {
            Ok(recipe) => result.recipes.push(recipe),
            Err(e) => {
                warn!(entry = %name, error = %e, "skipping unreadable archive entry");
                result.rejected.push(RejectedEntry {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        recipes = result.recipes.len(),
        rejected = result.rejected.len(),
        "recipe archive read"
    );
    Ok(result)
}
