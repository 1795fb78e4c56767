//! Flat `{{NAME}}` substitution for artifact templates.
//!
//! This is literal find-and-replace, not a template language: no escaping,
//! no nesting, and placeholders with no matching value pass through verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::types::{LabDefinition, ParameterValues, RenderedArtifacts};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder regex is valid")
});

/// Replace every `{{name}}` for each name present in `values`.
///
/// One pass over the template: text coming from a substituted value is never
/// scanned again.
pub fn render_template(template: &str, values: &ParameterValues) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Render every artifact template of `lab`.
pub fn render_artifacts(lab: &LabDefinition, values: &ParameterValues) -> RenderedArtifacts {
    lab.artifacts
        .iter()
        .map(|(name, template)| (name.clone(), render_template(template, values)))
        .collect()
}

/// Names of placeholders still present in `text`, deduplicated, in order of
/// first appearance.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in PLACEHOLDER_RE.captures_iter(text) {
        let name = &capture[1];
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}
