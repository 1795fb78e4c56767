//! `labseed expand`: parameters + rendered artifacts for one lab and seed.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::LabError;
use crate::core::params::{GenerateOptions, generate_values, validate_declarations};
use crate::core::render::{render_artifacts, unresolved_placeholders};
use crate::core::types::{LabDefinition, ParameterValues, RenderedArtifacts};
use crate::io::artifacts::write_artifacts;
use crate::io::config::LabseedConfig;

/// JSON record printed by `labseed expand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandOutcome {
    pub parameters: ParameterValues,
    pub artifacts: RenderedArtifacts,
}

/// Generate parameters and render every artifact of `lab` for `seed`.
pub fn expand_lab(
    lab: &LabDefinition,
    seed: &str,
    options: &GenerateOptions,
) -> Result<ExpandOutcome, LabError> {
    let validated = validate_declarations(&lab.parameters, options)?;
    for index in &validated.skipped {
        warn!(lab = %lab.id, index, "skipping parameter declaration without a name");
    }
    let parameters = generate_values(&validated.decls, seed)?;
    let artifacts = render_artifacts(lab, &parameters);
    for (name, text) in &artifacts {
        let unresolved = unresolved_placeholders(text);
        if !unresolved.is_empty() {
            warn!(
                lab = %lab.id,
                artifact = %name,
                placeholders = ?unresolved,
                "placeholders left unresolved"
            );
        }
    }
    info!(
        lab = %lab.id,
        parameters = parameters.len(),
        artifacts = artifacts.len(),
        "expanded lab"
    );
    Ok(ExpandOutcome {
        parameters,
        artifacts,
    })
}

/// Expand `lab` and write `<name>.<ext>` files under `output_dir`.
///
/// Nothing is written unless every declaration is valid.
pub fn expand_to_dir(
    lab: &LabDefinition,
    seed: &str,
    output_dir: &Path,
    config: &LabseedConfig,
) -> Result<ExpandOutcome> {
    let outcome = expand_lab(lab, seed, &config.generate_options())
        .with_context(|| format!("expand lab {}", lab.id))?;
    write_artifacts(output_dir, &outcome.artifacts, &config.artifact_extension)?;
    Ok(outcome)
}
