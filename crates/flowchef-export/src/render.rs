use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;

const RECIPE_TEMPLATE_NAME: &str = "recipe.html";
const RECIPE_TEMPLATE: &str = include_str!("../templates/recipe.html.tera");

/// Escape text for interpolation into HTML element content or a quoted
/// attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the recipe page template with `view` as its context.
///
/// Every interpolated value is passed through [`escape_html`] unless the
/// template marks it `safe`.
pub fn render_page<T: Serialize>(view: &T) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.set_escape_fn(escape_html);
    tera.add_raw_template(RECIPE_TEMPLATE_NAME, RECIPE_TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(view)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(RECIPE_TEMPLATE_NAME, &context)?;
    Ok(rendered)
}
