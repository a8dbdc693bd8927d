use std::sync::LazyLock;

use flowchef_core::models::Recipe;
use flowchef_core::validate::validate_recipe;
use regex::Regex;
use tracing::warn;

use crate::error::ExportError;

static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("invalid script pattern")
});

static RECIPE_DATA_ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bid\s*=\s*["']recipe-data["']"#).expect("invalid id pattern")
});

static JSON_TYPE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\btype\s*=\s*["']application/json["']"#).expect("invalid type pattern")
});

/// The text inside the recipe-data script element, if the page has one.
///
/// Works on the raw markup; no DOM is built.
pub fn extract_recipe_json(html: &str) -> Option<&str> {
    SCRIPT_ELEMENT.captures_iter(html).find_map(|caps| {
        let attrs = caps.get(1)?.as_str();
        if RECIPE_DATA_ID_ATTR.is_match(attrs) && JSON_TYPE_ATTR.is_match(attrs) {
            caps.get(2).map(|m| m.as_str())
        } else {
            None
        }
    })
}

/// Decode a recipe from an exported page, explaining any failure.
pub fn decode_recipe_html(html: &str) -> Result<Recipe, ExportError> {
    let payload = extract_recipe_json(html).ok_or(ExportError::MissingRecipeData)?;
    let value: serde_json::Value = serde_json::from_str(payload.trim())?;
    validate_recipe(&value).map_err(ExportError::Invalid)
}

/// Decode a recipe from an exported page, or `None` if the page has no
/// recipe data or the data is not a valid recipe.
pub fn parse_recipe_from_html(html: &str) -> Option<Recipe> {
    match decode_recipe_html(html) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            warn!(error = %e, "could not read recipe from html");
            None
        }
    }
}
