use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::message::Message;
use crate::slug::resolve_slug;
use crate::time;

/// A saved recipe: metadata plus an ordered list of step groups.
///
/// Serialized with camelCase keys so stored collections and exported HTML
/// files stay readable by every version of the app. Fields this version does
/// not know about are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// ISO-8601 string, kept verbatim. See [`crate::time`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    /// Free-form servings description; opaque to the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_system: Option<String>,
    /// Opaque like `servings`: older saves hold numbers, some hold strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings_count: Option<serde_json::Value>,
    pub flow_groups: Vec<FlowGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A run of steps that are either done one after another or side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGroup {
    #[serde(default)]
    pub parallel: bool,
    pub steps: Vec<Step>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FlowGroup {
    pub fn new(parallel: bool, steps: Vec<Step>) -> Self {
        Self {
            parallel,
            steps,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_number: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub instruction: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    /// Zero means the step has no timer. A stored `null` reads as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub timer_minutes: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Step {
    pub fn new(step_number: u32, step_type: StepType, instruction: impl Into<String>) -> Self {
        Self {
            step_number,
            step_type,
            instruction: instruction.into(),
            ingredients: Vec::new(),
            equipment: None,
            timer_minutes: 0.0,
            extra: BTreeMap::new(),
        }
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Prep,
    Cook,
    Rest,
}

impl StepType {
    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Prep => "prep",
            StepType::Cook => "cook",
            StepType::Rest => "rest",
        }
    }
}

/// Everything a cook lays out before starting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiseEnPlace {
    pub ingredients: Vec<String>,
    pub equipment: Vec<String>,
}

impl Recipe {
    /// A recipe with just a title and body; every optional field empty.
    pub fn new(title: impl Into<String>, flow_groups: Vec<FlowGroup>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            saved_at: None,
            servings: None,
            measure_system: None,
            servings_count: None,
            flow_groups,
            conversation_history: None,
            ingredients: None,
            equipment: None,
            extra: BTreeMap::new(),
        }
    }

    /// The storage key for this recipe: its slug, or one derived from the title.
    pub fn resolved_slug(&self) -> String {
        resolve_slug(self.slug.as_deref(), &self.title)
    }

    /// `savedAt` in epoch milliseconds; absent or unparseable is 0.
    pub fn saved_at_millis(&self) -> i64 {
        time::millis_or_epoch(self.saved_at.as_deref())
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.flow_groups.iter().flat_map(|g| g.steps.iter())
    }

    /// Top-level ingredients/equipment when present and non-empty, otherwise
    /// the de-duplicated union of what the steps mention, in first-seen order.
    pub fn mise_en_place(&self) -> MiseEnPlace {
        let ingredients = match &self.ingredients {
            Some(list) if !list.is_empty() => list.clone(),
            _ => dedup(self.steps().flat_map(|s| s.ingredients.iter())),
        };
        let equipment = match &self.equipment {
            Some(list) if !list.is_empty() => list.clone(),
            _ => dedup(
                self.steps()
                    .flat_map(|s| s.equipment.iter().flatten()),
            ),
        };
        MiseEnPlace {
            ingredients,
            equipment,
        }
    }

    /// Minutes of timers on the critical path: parallel groups contribute
    /// their longest timer, sequential groups the sum of theirs.
    pub fn total_timer_minutes(&self) -> f64 {
        self.flow_groups
            .iter()
            .map(|g| {
                let timers = g.steps.iter().map(|s| s.timer_minutes.max(0.0));
                if g.parallel {
                    timers.fold(0.0, f64::max)
                } else {
                    timers.sum()
                }
            })
            .sum()
    }

    /// A copy with every conversation image replaced by the placeholder.
    pub fn without_images(&self) -> Recipe {
        let mut stripped = self.clone();
        stripped.conversation_history = self
            .conversation_history
            .as_ref()
            .map(|history| history.iter().map(Message::without_images).collect());
        stripped
    }
}

fn dedup<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}
