use serde::{Deserialize, Serialize};

/// Visual styling for exported recipe pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlStyles {
    /// CSS font stack for all text.
    pub font_family: String,

    /// Page background.
    pub background: String,

    /// Headings and step numbers.
    pub accent: String,

    /// Badge colours per step type.
    pub prep_color: String,
    pub cook_color: String,
    pub rest_color: String,

    /// Maximum content width in pixels.
    pub max_width_px: u32,
}

impl Default for HtmlStyles {
    fn default() -> Self {
        Self {
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif"
                .to_string(),
            background: "#faf7f2".to_string(),
            accent: "#b4532a".to_string(),
            prep_color: "#3b82f6".to_string(),
            cook_color: "#ef4444".to_string(),
            rest_color: "#10b981".to_string(),
            max_width_px: 760,
        }
    }
}

impl HtmlStyles {
    /// The stylesheet embedded in every exported page.
    pub fn css(&self) -> String {
        format!(
            "body {{ margin: 0; background: {bg}; font-family: {font}; color: #2d2a26; }}
.recipe {{ max-width: {width}px; margin: 0 auto; padding: 32px 20px; }}
h1 {{ color: {accent}; margin: 0 0 8px; }}
h2 {{ font-size: 1.05rem; margin: 0 0 8px; }}
.meta span {{ margin-right: 16px; color: #6b645c; }}
.mise {{ display: flex; gap: 32px; flex-wrap: wrap; margin: 24px 0; }}
.group {{ margin: 16px 0; padding-left: 12px; border-left: 3px solid #e5ded4; }}
.group.parallel {{ border-left-color: {accent}; }}
.group-label {{ font-size: 0.8rem; text-transform: uppercase; color: {accent}; margin: 0 0 6px; }}
.step {{ background: #fff; border-radius: 10px; padding: 12px 16px; margin: 8px 0; box-shadow: 0 1px 2px rgba(0,0,0,0.06); }}
.step-head {{ display: flex; gap: 10px; align-items: center; }}
.num {{ font-weight: 700; color: {accent}; }}
.badge {{ font-size: 0.75rem; color: #fff; border-radius: 999px; padding: 2px 8px; }}
.step-prep .badge {{ background: {prep}; }}
.step-cook .badge {{ background: {cook}; }}
.step-rest .badge {{ background: {rest}; }}
.timer {{ margin-left: auto; font-variant-numeric: tabular-nums; }}
.uses {{ font-size: 0.85rem; color: #6b645c; margin: 4px 0 0; }}
footer {{ margin-top: 32px; font-size: 0.8rem; color: #9a9188; }}
",
            bg = self.background,
            font = self.font_family,
            width = self.max_width_px,
            accent = self.accent,
            prep = self.prep_color,
            cook = self.cook_color,
            rest = self.rest_color,
        )
    }
}
