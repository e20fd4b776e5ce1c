//! Registry invariants not expressible via JSON Schema.

use std::collections::HashSet;

use crate::core::prompt::PLACEHOLDER_RE;
use crate::core::style::StyleConfig;

/// Check semantic invariants of a style list:
/// - No duplicate ids
/// - Every section non-empty after trimming
/// - Placeholders only appear in `typography`
pub fn validate_registry_invariants(styles: &[StyleConfig]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    if styles.is_empty() {
        errors.push("registry must define at least one style".to_string());
    }

    for style in styles {
        if style.id.trim().is_empty() {
            errors.push("style id must be non-empty".to_string());
        }
        if !seen.insert(style.id.as_str()) {
            errors.push(format!("duplicate style id '{}'", style.id));
        }
        validate_sections(style, &mut errors);
    }

    errors
}

fn validate_sections(style: &StyleConfig, errors: &mut Vec<String>) {
    for (name, text) in style.sections.named() {
        if text.trim().is_empty() {
            errors.push(format!("{}: section '{}' must be non-empty", style.id, name));
        }
        if name != "typography"
            && let Some(found) = PLACEHOLDER_RE.find(text)
        {
            errors.push(format!(
                "{}: placeholder {} is only substituted in 'typography', found in '{}'",
                style.id,
                found.as_str(),
                name
            ));
        }
    }
}
