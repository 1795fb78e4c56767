//! Lab document loading and lab directory discovery.
//!
//! A labs root holds one directory per lab, each with a `lab.yaml`,
//! `lab.yml` or `lab.json` document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::core::types::LabDefinition;

/// Document names looked up inside each lab directory, in priority order.
pub const LAB_FILE_NAMES: [&str; 3] = ["lab.yaml", "lab.yml", "lab.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabFormat {
    Yaml,
    Json,
}

impl LabFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(LabFormat::Yaml),
            Some("json") => Ok(LabFormat::Json),
            _ => Err(anyhow!(
                "unsupported lab document {} (expected .yaml, .yml or .json)",
                path.display()
            )),
        }
    }
}

/// Parse a lab document from a string.
pub fn parse_lab(contents: &str, format: LabFormat) -> Result<LabDefinition> {
    let lab: LabDefinition = match format {
        LabFormat::Yaml => serde_yaml::from_str(contents).context("parse lab yaml")?,
        LabFormat::Json => serde_json::from_str(contents).context("parse lab json")?,
    };
    if lab.id.trim().is_empty() {
        bail!("lab id must be non-empty");
    }
    Ok(lab)
}

/// Load a lab document, picking the format from the file extension.
pub fn load_lab(path: &Path) -> Result<LabDefinition> {
    let format = LabFormat::from_path(path)?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("read lab {}", path.display()))?;
    parse_lab(&contents, format).with_context(|| format!("load lab {}", path.display()))
}

/// The lab document inside `dir`, if any.
pub fn lab_document_in(dir: &Path) -> Option<PathBuf> {
    LAB_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Load a lab from a document path or from a lab directory.
pub fn open_lab(path: &Path) -> Result<LabDefinition> {
    if path.is_dir() {
        let document = lab_document_in(path)
            .ok_or_else(|| anyhow!("no lab document in {}", path.display()))?;
        return load_lab(&document);
    }
    load_lab(path)
}

/// A lab found under a labs root.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredLab {
    pub path: PathBuf,
    pub lab: LabDefinition,
}

/// Load every lab under `root`, sorted by directory name.
///
/// Directories without a lab document are ignored; a malformed document fails
/// the whole discovery.
pub fn discover_labs(root: &Path) -> Result<Vec<DiscoveredLab>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read labs root {}", root.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", root.display()))?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    let mut labs = Vec::new();
    for dir in dirs {
        let Some(path) = lab_document_in(&dir) else {
            debug!(dir = %dir.display(), "no lab document, skipping");
            continue;
        };
        let lab = load_lab(&path)?;
        labs.push(DiscoveredLab { path, lab });
    }
    Ok(labs)
}

/// Load the lab a command targets: by id under `labs_root` when given,
/// otherwise from the document or directory path `target`.
pub fn load_target(target: &Path, labs_root: Option<&Path>) -> Result<LabDefinition> {
    let Some(root) = labs_root else {
        return open_lab(target);
    };
    let id = target
        .to_str()
        .ok_or_else(|| anyhow!("lab id {} is not valid UTF-8", target.display()))?;
    Ok(find_lab(root, id)?.lab)
}

/// Find the lab with `id` under `root`.
pub fn find_lab(root: &Path, id: &str) -> Result<DiscoveredLab> {
    discover_labs(root)?
        .into_iter()
        .find(|found| found.lab.id == id)
        .ok_or_else(|| anyhow!("lab {} not found under {}", id, root.display()))
}
