//! Test-only helpers for building lab declarations and lab directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::types::{LabDefinition, ParamValue, ParameterRecord};

fn record(name: &str, kind: &str) -> ParameterRecord {
    ParameterRecord {
        name: Some(name.to_string()),
        kind: Some(kind.to_string()),
        ..ParameterRecord::default()
    }
}

/// `random_hex` declaration; `None` leaves `length` to the default.
pub fn hex_param(name: &str, length: Option<usize>) -> ParameterRecord {
    ParameterRecord {
        length,
        ..record(name, "random_hex")
    }
}

pub fn int_param(name: &str, min: Option<i64>, max: Option<i64>) -> ParameterRecord {
    ParameterRecord {
        min,
        max,
        ..record(name, "random_int")
    }
}

pub fn choice_param(name: &str, choices: Vec<ParamValue>) -> ParameterRecord {
    ParameterRecord {
        choices: Some(choices.into_iter().map(Some).collect()),
        ..record(name, "choice")
    }
}

/// Lab `test` with the given declarations and `(name, template)` artifacts.
pub fn lab_with(parameters: Vec<ParameterRecord>, artifacts: &[(&str, &str)]) -> LabDefinition {
    LabDefinition {
        id: "test".to_string(),
        title: None,
        description: None,
        difficulty: None,
        hints: Vec::new(),
        parameters,
        artifacts: artifacts
            .iter()
            .map(|(name, template)| (name.to_string(), template.to_string()))
            .collect(),
        validators: Vec::new(),
    }
}

/// Temporary labs root with one directory per lab.
pub struct LabDir {
    temp: TempDir,
}

impl LabDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp labs root")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `lab` as `<root>/<dir>/lab.yaml` and return the document path.
    pub fn write_lab(&self, dir: &str, lab: &LabDefinition) -> Result<PathBuf> {
        let lab_dir = self.path().join(dir);
        fs::create_dir_all(&lab_dir).with_context(|| format!("create {}", lab_dir.display()))?;
        let path = lab_dir.join("lab.yaml");
        let yaml = serde_yaml::to_string(lab).context("serialize lab yaml")?;
        fs::write(&path, yaml).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write raw bytes at `relative` under the root.
    pub fn write_file(&self, relative: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Deterministic pseudo-random alphanumeric strings for property-style tests.
#[cfg(test)]
pub fn sample_strings(count: usize, rng_seed: u64) -> Vec<String> {
    use rand::distributions::Alphanumeric;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(rng_seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=24);
            (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
        })
        .collect()
}
