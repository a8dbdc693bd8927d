//! Structural checks for recipes arriving from outside the app (import
//! files, hand-edited JSON). Produces either a typed [`Recipe`] or the full
//! list of problems found, so a rejected file can be explained.

use serde_json::Value;
use thiserror::Error;

use crate::error::CoreError;
use crate::models::Recipe;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationIssue {
    /// JSON path of the offending value, e.g. `flowGroups[1].steps[0].type`.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

const STEP_TYPES: &[&str] = &["prep", "cook", "rest"];

/// Validate a JSON value as a recipe.
///
/// Requires an object with a non-empty string `title` and an array
/// `flowGroups`. Groups and steps are checked for shape so the issue list
/// points at the exact entry that is wrong.
pub fn validate_recipe(value: &Value) -> Result<Recipe, Vec<ValidationIssue>> {
    let Some(obj) = value.as_object() else {
        return Err(vec![ValidationIssue::new("$", "expected a JSON object")]);
    };

    let mut issues = Vec::new();

    match obj.get("title") {
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(Value::String(_)) => issues.push(ValidationIssue::new("title", "must not be empty")),
        Some(_) => issues.push(ValidationIssue::new("title", "expected a string")),
        None => issues.push(ValidationIssue::new("title", "missing")),
    }

    match obj.get("flowGroups") {
        Some(Value::Array(groups)) => {
            for (gi, group) in groups.iter().enumerate() {
                check_group(&format!("flowGroups[{gi}]"), group, &mut issues);
            }
        }
        Some(_) => issues.push(ValidationIssue::new("flowGroups", "expected an array")),
        None => issues.push(ValidationIssue::new("flowGroups", "missing")),
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    serde_json::from_value(value.clone()).map_err(|e| vec![ValidationIssue::new("$", e.to_string())])
}

fn check_group(path: &str, group: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(group) = group.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return;
    };
    if let Some(parallel) = group.get("parallel")
        && !parallel.is_boolean()
    {
        issues.push(ValidationIssue::new(format!("{path}.parallel"), "expected a boolean"));
    }
    let Some(steps) = group.get("steps").and_then(Value::as_array) else {
        issues.push(ValidationIssue::new(format!("{path}.steps"), "expected an array"));
        return;
    };
    for (si, step) in steps.iter().enumerate() {
        check_step(&format!("{path}.steps[{si}]"), step, issues);
    }
}

fn check_step(path: &str, step: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(step) = step.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return;
    };
    if !step.get("stepNumber").is_some_and(Value::is_u64) {
        issues.push(ValidationIssue::new(
            format!("{path}.stepNumber"),
            "expected a non-negative integer",
        ));
    }
    match step.get("type").and_then(Value::as_str) {
        Some(t) if STEP_TYPES.contains(&t) => {}
        _ => issues.push(ValidationIssue::new(
            format!("{path}.type"),
            "expected one of prep, cook, rest",
        )),
    }
    if !step.get("instruction").is_some_and(Value::is_string) {
        issues.push(ValidationIssue::new(format!("{path}.instruction"), "expected a string"));
    }
    if let Some(timer) = step.get("timerMinutes")
        && !(timer.is_number() || timer.is_null())
    {
        issues.push(ValidationIssue::new(format!("{path}.timerMinutes"), "expected a number"));
    }
}

/// Parse and validate recipe JSON text in one step.
pub fn recipe_from_json(text: &str) -> Result<Recipe, CoreError> {
    let value: Value = serde_json::from_str(text)?;
    validate_recipe(&value).map_err(CoreError::Invalid)
}
