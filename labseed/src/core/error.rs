//! Error taxonomy for lab generation.
//!
//! Every generation error is fatal to the current run. Generation is pure, so
//! the same invalid input always fails the same way.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    /// Input file for the binary mutator does not exist.
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Declaration is structurally valid YAML/JSON but semantically unusable.
    #[error("invalid declaration for parameter '{parameter}' ({kind}): {reason}")]
    InvalidDeclaration {
        parameter: String,
        kind: String,
        reason: String,
    },

    #[error("unsupported parameter type '{kind}' for parameter '{parameter}'")]
    UnsupportedType { parameter: String, kind: String },

    /// Declaration at `index` (0-based) has no usable name.
    #[error("parameter declaration #{index} has no name")]
    MissingParameterName { index: usize },

    #[error("requested {requested} derived hex chars but only {available} are available")]
    DerivationTooLong { requested: usize, available: usize },
}

impl LabError {
    pub(crate) fn invalid(parameter: &str, kind: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            parameter: parameter.to_string(),
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}
