//! Substitution engine
//!
//! Rendering is a single pass over a template's segments: replacement text
//! is inserted verbatim and never rescanned for placeholders.

use fopgen_registry::SubstitutionMap;

use crate::errors::RenderError;
use crate::template::{Segment, Template};

/// Render a template against one substitution map
///
/// Every placeholder must have a value. A missing one is an error rather
/// than an empty string or the literal token, either of which could still
/// compile into a broken plugin.
pub fn render(template: &Template, subs: &SubstitutionMap) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.text().len() * 2);

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(token) => {
                let value = subs.get(token).ok_or_else(|| RenderError {
                    token: token.clone(),
                })?;
                out.push_str(value);
            }
        }
    }

    Ok(out)
}

/// Placeholders a template uses that the map cannot supply
pub fn missing_placeholders<'t>(template: &'t Template, subs: &SubstitutionMap) -> Vec<&'t str> {
    template
        .placeholders()
        .into_iter()
        .filter(|token| !subs.contains(token))
        .collect()
}
