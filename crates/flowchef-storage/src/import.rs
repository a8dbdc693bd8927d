//! Merging externally supplied recipes into the saved collection.
//!
//! Recipes are matched by slug. The newer `savedAt` wins; on a tie the
//! local copy is kept. An imported recipe without a timestamp is stamped
//! with the epoch, so it is added when new and loses every conflict.

use flowchef_core::models::Recipe;
use flowchef_core::time::EPOCH;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::StorageError;
use crate::objects::KeyValueStore;
use crate::recipes::{RecipeStore, position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Added,
    Updated,
    Skipped,
}

/// Recipes of one import batch, bucketed by outcome, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub added: Vec<Recipe>,
    pub updated: Vec<Recipe>,
    pub skipped: Vec<Recipe>,
}

impl ImportSummary {
    fn record(&mut self, outcome: ImportOutcome, recipe: Recipe) {
        match outcome {
            ImportOutcome::Added => self.added.push(recipe),
            ImportOutcome::Updated => self.updated.push(recipe),
            ImportOutcome::Skipped => self.skipped.push(recipe),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.skipped.len()
    }
}

/// Give an incoming recipe its slug and, if it has none, the epoch timestamp.
fn normalize(mut recipe: Recipe) -> Recipe {
    recipe.slug = Some(recipe.resolved_slug());
    if recipe.saved_at.as_deref().is_none_or(str::is_empty) {
        recipe.saved_at = Some(EPOCH.to_string());
    }
    recipe
}

/// Merge one recipe into `collection` in place.
///
/// Returns the outcome together with the normalized incoming recipe.
pub fn reconcile(collection: &mut Vec<Recipe>, incoming: Recipe) -> (ImportOutcome, Recipe) {
    let incoming = normalize(incoming);
    let slug = incoming.resolved_slug();

    let Some(idx) = position(collection, &slug) else {
        collection.insert(0, incoming.clone());
        return (ImportOutcome::Added, incoming);
    };

    let imported_time = incoming.saved_at_millis();
    let existing_time = collection[idx].saved_at_millis();
    debug!(slug = %slug, imported_time, existing_time, "import conflict");

    if imported_time > existing_time {
        collection[idx] = incoming.clone();
        (ImportOutcome::Updated, incoming)
    } else {
        (ImportOutcome::Skipped, incoming)
    }
}

impl<S: KeyValueStore, C: Clock> RecipeStore<S, C> {
    /// Import a single recipe, persisting unless it was skipped.
    pub fn import_recipe(&mut self, recipe: Recipe) -> Result<ImportOutcome, StorageError> {
        self.import_one(recipe).map(|(outcome, _)| outcome)
    }

    fn import_one(&mut self, recipe: Recipe) -> Result<(ImportOutcome, Recipe), StorageError> {
        let mut collection = self.load_sorted();
        let (outcome, recipe) = reconcile(&mut collection.recipes, recipe);
        if outcome != ImportOutcome::Skipped {
            self.persist(&collection)?;
        }
        info!(slug = ?recipe.slug, ?outcome, "recipe imported");
        Ok((outcome, recipe))
    }

    /// Import recipes one after another, in input order.
    ///
    /// Each recipe sees the effect of those before it, including earlier
    /// recipes of the same batch with the same slug. There is no rollback:
    /// if persisting fails part-way, the recipes already imported stay.
    pub fn import_recipes(
        &mut self,
        recipes: impl IntoIterator<Item = Recipe>,
    ) -> Result<ImportSummary, StorageError> {
        let mut summary = ImportSummary::default();
        for recipe in recipes {
            let (outcome, recipe) = self.import_one(recipe)?;
            summary.record(outcome, recipe);
        }
        info!(
            added = summary.added.len(),
            updated = summary.updated.len(),
            skipped = summary.skipped.len(),
            "import batch complete"
        );
        Ok(summary)
    }

    /// What [`import_recipes`](Self::import_recipes) would report for the
    /// same input, without touching storage.
    pub fn preview_import(&self, recipes: &[Recipe]) -> ImportSummary {
        let mut scratch = self.get_saved_recipes();
        let mut summary = ImportSummary::default();
        for recipe in recipes {
            let (outcome, recipe) = reconcile(&mut scratch, recipe.clone());
            summary.record(outcome, recipe);
        }
        summary
    }
}
