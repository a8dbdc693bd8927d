use std::cmp::Reverse;

use flowchef_core::models::{Recipe, RecipeOutput, RecipePatch};
use flowchef_core::slug::resolve_slug;
use flowchef_core::storage_keys;
use flowchef_core::time::format_timestamp;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::objects::KeyValueStore;

/// The saved-recipe collection, persisted as one JSON array under
/// [`storage_keys::SAVED_RECIPES`].
///
/// Every operation is a full read-modify-write of that array. Reads never
/// fail: a missing, unreadable, or corrupt collection comes back empty and
/// a warning is logged. Entries that are valid JSON but do not decode as a
/// [`Recipe`] are hidden from reads and written back unchanged.
pub struct RecipeStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> RecipeStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: KeyValueStore, C: Clock> RecipeStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// All saved recipes, newest `savedAt` first. Recipes without a usable
    /// timestamp sort last; ties keep their stored order.
    pub fn get_saved_recipes(&self) -> Vec<Recipe> {
        self.load_sorted().recipes
    }

    /// Assign a slug if the recipe has none, stamp `savedAt` with the current
    /// time, and insert it (or overwrite the entry with the same slug).
    pub fn save_recipe(&mut self, mut recipe: Recipe) -> Result<Recipe, StorageError> {
        let slug = recipe.resolved_slug();
        recipe.slug = Some(slug.clone());
        recipe.saved_at = Some(self.stamp());

        let mut collection = self.load_sorted();
        collection.release(&slug);
        match position(&collection.recipes, &slug) {
            Some(idx) => {
                collection.recipes[idx] = recipe.clone();
                info!(slug = %slug, "recipe overwritten");
            }
            None => {
                collection.recipes.insert(0, recipe.clone());
                info!(slug = %slug, "recipe saved");
            }
        }
        self.persist(&collection)?;
        Ok(recipe)
    }

    /// Save freshly extracted model output as a new recipe.
    pub fn save_output(&mut self, output: RecipeOutput) -> Result<Recipe, StorageError> {
        self.save_recipe(Recipe::from(output))
    }

    pub fn get_recipe_by_slug(&self, slug: &str) -> Option<Recipe> {
        self.load().recipes.into_iter().find(|r| r.resolved_slug() == slug)
    }

    /// Remove the recipe with `slug`. Returns whether anything was removed.
    pub fn delete_recipe(&mut self, slug: &str) -> Result<bool, StorageError> {
        let mut collection = self.load_sorted();
        let before = collection.len();
        collection.recipes.retain(|r| r.resolved_slug() != slug);
        collection.release(slug);
        if collection.len() == before {
            debug!(slug, "delete: no such recipe");
            return Ok(false);
        }
        self.persist(&collection)?;
        info!(slug, "recipe deleted");
        Ok(true)
    }

    /// Apply `patch` to the recipe with `slug` and re-stamp `savedAt`.
    /// Returns `None` if no recipe has that slug.
    pub fn update_recipe(
        &mut self,
        slug: &str,
        patch: RecipePatch,
    ) -> Result<Option<Recipe>, StorageError> {
        let mut collection = self.load_sorted();
        let Some(idx) = position(&collection.recipes, slug) else {
            debug!(slug, "update: no such recipe");
            return Ok(None);
        };

        let mut updated = collection.recipes[idx].clone();
        patch.apply(&mut updated);
        updated.slug = Some(slug.to_string());
        updated.saved_at = Some(self.stamp());
        collection.recipes[idx] = updated.clone();

        self.persist(&collection)?;
        info!(slug, "recipe updated");
        Ok(Some(updated))
    }

    fn stamp(&self) -> String {
        format_timestamp(self.clock.now())
    }

    /// Read the stored array in stored order.
    ///
    /// Entries are decoded one by one. An entry that does not decode is
    /// logged and set aside so [`persist`](Self::persist) can write it back.
    pub(crate) fn load(&self) -> Collection {
        let raw = match self.store.get(storage_keys::SAVED_RECIPES) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Collection::default(),
            Err(e) => {
                warn!(error = %e, key = storage_keys::SAVED_RECIPES, "failed to read saved recipes");
                return Collection::default();
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    error = %e,
                    key = storage_keys::SAVED_RECIPES,
                    bytes = raw.len(),
                    "saved recipes are corrupt, treating as empty"
                );
                return Collection::default();
            }
        };

        let mut collection = Collection::default();
        for (i, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Recipe>(entry.clone()) {
                Ok(recipe) => collection.recipes.push(recipe),
                Err(e) => {
                    warn!(index = i, error = %e, "keeping unreadable saved recipe as-is");
                    collection.unreadable.push(entry);
                }
            }
        }
        debug!(
            count = collection.recipes.len(),
            unreadable = collection.unreadable.len(),
            "loaded saved recipes"
        );
        collection
    }

    /// [`load`](Self::load) with recipes newest first.
    pub(crate) fn load_sorted(&self) -> Collection {
        let mut collection = self.load();
        collection
            .recipes
            .sort_by_key(|r| Reverse(r.saved_at_millis()));
        collection
    }

    /// Write recipes followed by the unreadable entries they were loaded with.
    pub(crate) fn persist(&mut self, collection: &Collection) -> Result<(), StorageError> {
        let mut entries = Vec::with_capacity(collection.len());
        for recipe in &collection.recipes {
            entries.push(serde_json::to_value(recipe)?);
        }
        entries.extend(collection.unreadable.iter().cloned());
        let body = serde_json::to_string(&entries)?;
        self.store.set(storage_keys::SAVED_RECIPES, body)?;
        debug!(
            count = collection.recipes.len(),
            unreadable = collection.unreadable.len(),
            "persisted saved recipes"
        );
        Ok(())
    }
}

/// The stored array, split into entries that decode as recipes and the raw
/// JSON of those that don't.
#[derive(Debug, Default)]
pub(crate) struct Collection {
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) unreadable: Vec<Value>,
}

impl Collection {
    fn len(&self) -> usize {
        self.recipes.len() + self.unreadable.len()
    }

    /// Drop unreadable entries stored under `slug`. Used when a readable
    /// recipe takes over the slug, or the slug is deleted.
    pub(crate) fn release(&mut self, slug: &str) {
        self.unreadable.retain(|entry| raw_slug(entry).as_deref() != Some(slug));
    }
}

/// The slug an undecoded entry is stored under, if it has a usable one.
fn raw_slug(entry: &Value) -> Option<String> {
    let slug = entry.get("slug").and_then(Value::as_str);
    let title = entry.get("title").and_then(Value::as_str);
    match (slug, title) {
        (None, None) => None,
        (slug, title) => Some(resolve_slug(slug, title.unwrap_or_default())),
    }
}

pub(crate) fn position(recipes: &[Recipe], slug: &str) -> Option<usize> {
    recipes.iter().position(|r| r.resolved_slug() == slug)
}
