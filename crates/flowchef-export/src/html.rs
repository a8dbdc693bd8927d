use flowchef_core::models::Recipe;
use serde::Serialize;
use tracing::debug;

use crate::error::ExportError;
use crate::render::render_page;
use crate::styles::HtmlStyles;

/// `id` of the `<script type="application/json">` element that carries the
/// recipe. This attribute pair is the only machine-readable part of an
/// exported page.
pub const RECIPE_DATA_ID: &str = "recipe-data";

/// Copy of `recipe` with conversation images swapped for the `[image]`
/// placeholder. Exported files never carry image payloads.
pub fn strip_conversation_images(recipe: &Recipe) -> Recipe {
    recipe.without_images()
}

/// Render `recipe` as a standalone HTML page with the default styles.
pub fn generate_recipe_html(recipe: &Recipe) -> Result<String, ExportError> {
    generate_recipe_html_with(recipe, &HtmlStyles::default())
}

pub fn generate_recipe_html_with(
    recipe: &Recipe,
    styles: &HtmlStyles,
) -> Result<String, ExportError> {
    let stripped = strip_conversation_images(recipe);
    let recipe_json = script_safe_json(&stripped)?;
    let view = PageView::new(&stripped, recipe_json, styles.css());
    let html = render_page(&view)?;
    debug!(slug = %stripped.resolved_slug(), bytes = html.len(), "rendered recipe html");
    Ok(html)
}

/// Pretty JSON that cannot terminate the surrounding `<script>` element.
///
/// `<` only ever occurs inside JSON strings, where `<` is an equivalent
/// escape, so the payload parses back to the same value.
fn script_safe_json(recipe: &Recipe) -> Result<String, ExportError> {
    let json = serde_json::to_string_pretty(recipe)?;
    Ok(json.replace('<', "\\u003c"))
}

#[derive(Serialize)]
struct PageView {
    title: String,
    servings: Option<String>,
    total_time: Option<String>,
    saved_at: Option<String>,
    ingredients: Vec<String>,
    equipment: Vec<String>,
    groups: Vec<GroupView>,
    css: String,
    recipe_json: String,
}

#[derive(Serialize)]
struct GroupView {
    parallel: bool,
    steps: Vec<StepView>,
}

#[derive(Serialize)]
struct StepView {
    number: u32,
    kind: &'static str,
    instruction: String,
    timer: Option<String>,
    ingredients: String,
}

impl PageView {
    fn new(recipe: &Recipe, recipe_json: String, css: String) -> Self {
        let mise = recipe.mise_en_place();
        let total = recipe.total_timer_minutes();
        Self {
            title: recipe.title.clone(),
            servings: recipe.servings.as_ref().and_then(display_servings),
            total_time: (total > 0.0).then(|| format_minutes(total)),
            saved_at: recipe.saved_at.clone(),
            ingredients: mise.ingredients,
            equipment: mise.equipment,
            groups: recipe
                .flow_groups
                .iter()
                .map(|g| GroupView {
                    parallel: g.parallel,
                    steps: g
                        .steps
                        .iter()
                        .map(|s| StepView {
                            number: s.step_number,
                            kind: s.step_type.as_str(),
                            instruction: s.instruction.clone(),
                            timer: (s.timer_minutes > 0.0).then(|| format_minutes(s.timer_minutes)),
                            ingredients: s.ingredients.join(", "),
                        })
                        .collect(),
                })
                .collect(),
            css,
            recipe_json,
        }
    }
}

fn display_servings(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `10.0` renders as `10`, `2.5` as `2.5`.
fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{}", minutes as i64)
    } else {
        format!("{minutes}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_drop_trailing_zero() {
        assert_eq!(format_minutes(10.0), "10");
        assert_eq!(format_minutes(2.5), "2.5");
    }

    #[test]
    fn script_payload_has_no_angle_brackets() {
        let recipe = Recipe::new("</script><b>bold</b>", vec![]);
        let json = script_safe_json(&recipe).unwrap();
        assert!(!json.contains('<'));
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "</script><b>bold</b>");
    }
}
