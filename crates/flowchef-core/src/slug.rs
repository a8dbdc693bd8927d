/// Derive a slug from a recipe title.
///
/// Lowercases, drops everything outside `[a-z0-9\s-]`, turns whitespace runs
/// into a single hyphen, collapses repeated hyphens, and trims hyphens from
/// both ends. Non-ASCII letters are dropped, not transliterated.
pub fn generate_slug(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug.trim_matches('-').to_string()
}

/// The explicit slug when present and non-empty, otherwise one derived from
/// the title.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> String {
    match explicit {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => generate_slug(title),
    }
}
