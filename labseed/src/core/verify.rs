//! Submission validators declared by a lab.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::render::render_template;
use crate::core::types::ParameterValues;

/// A validator entry in a lab document. Text fields may contain placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidatorSpec {
    /// Submission must contain the rendered `value`.
    FlagContains { value: String },
    /// Rendered `path` must exist under the session staging directory.
    FileExists { path: String },
}

impl ValidatorSpec {
    pub fn type_name(&self) -> &'static str {
        match self {
            ValidatorSpec::FlagContains { .. } => "flag_contains",
            ValidatorSpec::FileExists { .. } => "file_exists",
        }
    }
}

/// True when both sides are non-empty after trimming and the trimmed
/// submission contains the trimmed expectation.
pub fn flag_contains(submission: &str, expected: &str) -> bool {
    let submission = submission.trim();
    let expected = expected.trim();
    if submission.is_empty() || expected.is_empty() {
        return false;
    }
    submission.contains(expected)
}

/// Render `path` and resolve it under `staging_dir`, stripping one leading `/`
/// so absolute-looking paths stay inside the staging directory.
pub fn staged_path(staging_dir: &Path, path: &str, values: &ParameterValues) -> PathBuf {
    let rendered = render_template(path, values);
    let relative = rendered.strip_prefix('/').unwrap_or(rendered.as_str());
    staging_dir.join(relative)
}
