use serde::{Deserialize, Serialize};

use super::message::Message;
use super::recipe::{FlowGroup, Recipe};

/// The structured recipe returned by the extraction model, before it has a
/// slug or a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeOutput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<serde_json::Value>,
    pub flow_groups: Vec<FlowGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
}

impl From<RecipeOutput> for Recipe {
    fn from(output: RecipeOutput) -> Self {
        let mut recipe = Recipe::new(output.title, output.flow_groups);
        recipe.servings = output.servings;
        recipe.ingredients = output.ingredients;
        recipe.equipment = output.equipment;
        recipe
    }
}

/// Field-level changes for an existing recipe. Absent fields are left as
/// they are; the slug is never changed by a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub servings: Option<serde_json::Value>,
    #[serde(default)]
    pub measure_system: Option<String>,
    #[serde(default)]
    pub servings_count: Option<serde_json::Value>,
    #[serde(default)]
    pub flow_groups: Option<Vec<FlowGroup>>,
    #[serde(default)]
    pub conversation_history: Option<Vec<Message>>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn apply(self, recipe: &mut Recipe) {
        if let Some(title) = self.title {
            recipe.title = title;
        }
        if let Some(servings) = self.servings {
            recipe.servings = Some(servings);
        }
        if let Some(measure_system) = self.measure_system {
            recipe.measure_system = Some(measure_system);
        }
        if let Some(count) = self.servings_count {
            recipe.servings_count = Some(count);
        }
        if let Some(groups) = self.flow_groups {
            recipe.flow_groups = groups;
        }
        if let Some(history) = self.conversation_history {
            recipe.conversation_history = Some(history);
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = Some(ingredients);
        }
        if let Some(equipment) = self.equipment {
            recipe.equipment = Some(equipment);
        }
    }
}
