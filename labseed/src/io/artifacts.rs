//! Writing rendered artifacts to an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::types::RenderedArtifacts;

/// Write each artifact to `<output_dir>/<name>.<extension>` with exactly the
/// rendered text. Returns the written paths in artifact order.
pub fn write_artifacts(
    output_dir: &Path,
    artifacts: &RenderedArtifacts,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, text) in artifacts {
        ensure_plain_name(name)?;
        let path = output_dir.join(format!("{name}.{extension}"));
        fs::write(&path, text).with_context(|| format!("write artifact {}", path.display()))?;
        debug!(path = %path.display(), bytes = text.len(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

/// Artifact names become file names; refuse anything that could escape the
/// output directory.
fn ensure_plain_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("artifact name '{name}' is not a plain file name");
    }
    Ok(())
}
