//! Generator configuration stored in `labseed.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::derive::DEFAULT_FLAG_LABEL;
use crate::core::params::{DEFAULT_HEX_LENGTH, GenerateOptions, NamePolicy};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "labseed.toml";

/// Generator configuration (TOML).
///
/// Missing fields fall back to defaults. None of these values are hidden
/// globals: each is passed explicitly into the derivation functions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabseedConfig {
    /// Label used by `labseed flag` when `--label` is not given.
    pub flag_label: String,

    /// Length for `random_hex` declarations that omit `length`.
    pub default_hex_length: usize,

    /// Reject unnamed parameter declarations instead of skipping them.
    /// Off by default: unnamed declarations are skipped with a warning.
    pub strict_names: bool,

    /// File extension for written artifacts.
    pub artifact_extension: String,
}

impl Default for LabseedConfig {
    fn default() -> Self {
        Self {
            flag_label: DEFAULT_FLAG_LABEL.to_string(),
            default_hex_length: DEFAULT_HEX_LENGTH,
            strict_names: false,
            artifact_extension: "txt".to_string(),
        }
    }
}

impl LabseedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.flag_label.trim().is_empty() {
            return Err(anyhow!("flag_label must be non-empty"));
        }
        if self.default_hex_length == 0 {
            return Err(anyhow!("default_hex_length must be > 0"));
        }
        let ext = self.artifact_extension.trim();
        if ext.is_empty() || ext.contains(['/', '\\', '.']) {
            return Err(anyhow!(
                "artifact_extension must be a bare, non-empty extension (got '{}')",
                self.artifact_extension
            ));
        }
        Ok(())
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            default_hex_length: self.default_hex_length,
            names: if self.strict_names {
                NamePolicy::Reject
            } else {
                NamePolicy::Skip
            },
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LabseedConfig::default()`.
pub fn load_config(path: &Path) -> Result<LabseedConfig> {
    if !path.exists() {
        let cfg = LabseedConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LabseedConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
