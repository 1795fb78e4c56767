//! Parameter generation.
//!
//! Declarations are validated up front into [`ParameterDecl`]s, then each one
//! is derived under its own name as the label. Any declaration error aborts the
//! whole run; no partial mapping is ever returned.

use std::collections::HashSet;

use crate::core::derive::{DIGEST_HEX_LEN, derive_hex, derive_uint};
use crate::core::error::LabError;
use crate::core::types::{
    LabDefinition, ParamValue, ParameterDecl, ParameterKind, ParameterRecord, ParameterValues,
};

/// Reserved mapping entry holding the raw session seed.
pub const SEED_KEY: &str = "SEED";

/// Digest bytes read for `random_int` (12 hex chars).
pub const INT_PREFIX_BYTES: usize = 6;

/// Digest bytes read for `choice` (8 hex chars).
pub const CHOICE_PREFIX_BYTES: usize = 4;

pub const DEFAULT_HEX_LENGTH: usize = 8;
pub const DEFAULT_INT_MIN: i64 = 0;
pub const DEFAULT_INT_MAX: i64 = 100;

/// How to treat declarations without a name (absent or `""`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePolicy {
    /// Fail the run with [`LabError::MissingParameterName`].
    Reject,
    /// Drop the declaration and report its index.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Length used for `random_hex` declarations without `length`.
    pub default_hex_length: usize,
    pub names: NamePolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            default_hex_length: DEFAULT_HEX_LENGTH,
            names: NamePolicy::Skip,
        }
    }
}

/// Declarations that passed validation, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    pub decls: Vec<ParameterDecl>,
    /// Indexes of unnamed records dropped under [`NamePolicy::Skip`].
    pub skipped: Vec<usize>,
}

/// Validate raw records into typed declarations.
pub fn validate_declarations(
    records: &[ParameterRecord],
    options: &GenerateOptions,
) -> Result<ValidatedParameters, LabError> {
    let mut decls = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    let mut seen = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        // Names are used verbatim: they are both the mapping key and the label.
        let name = match record.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => match options.names {
                NamePolicy::Reject => return Err(LabError::MissingParameterName { index }),
                NamePolicy::Skip => {
                    skipped.push(index);
                    continue;
                }
            },
        };
        if !seen.insert(name.clone()) {
            return Err(LabError::invalid(
                &name,
                record.kind.as_deref().unwrap_or_default(),
                "duplicate parameter name",
            ));
        }
        let kind = parse_kind(&name, record, options)?;
        decls.push(ParameterDecl { name, kind });
    }

    Ok(ValidatedParameters { decls, skipped })
}

fn parse_kind(
    name: &str,
    record: &ParameterRecord,
    options: &GenerateOptions,
) -> Result<ParameterKind, LabError> {
    let type_name = record.kind.as_deref().unwrap_or_default();
    let kind = match type_name {
        ParameterKind::RANDOM_HEX => ParameterKind::RandomHex {
            length: record.length.unwrap_or(options.default_hex_length),
        },
        ParameterKind::RANDOM_INT => ParameterKind::RandomInt {
            min: record.min.unwrap_or(DEFAULT_INT_MIN),
            max: record.max.unwrap_or(DEFAULT_INT_MAX),
        },
        ParameterKind::CHOICE => ParameterKind::Choice {
            choices: choice_candidates(name, record)?,
        },
        other => {
            return Err(LabError::UnsupportedType {
                parameter: name.to_string(),
                kind: other.to_string(),
            });
        }
    };
    check_kind(name, &kind)?;
    Ok(kind)
}

/// Candidates of a `choice` record. A `null` entry names its position.
fn choice_candidates(name: &str, record: &ParameterRecord) -> Result<Vec<ParamValue>, LabError> {
    let Some(raw) = &record.choices else {
        return Ok(Vec::new());
    };
    raw.iter()
        .enumerate()
        .map(|(position, candidate)| {
            candidate.clone().ok_or_else(|| {
                LabError::invalid(
                    name,
                    ParameterKind::CHOICE,
                    format!("choice #{position} is null"),
                )
            })
        })
        .collect()
}

/// Reject constraints that would make derivation fail or divide by zero.
fn check_kind(name: &str, kind: &ParameterKind) -> Result<(), LabError> {
    let type_name = kind.type_name();
    match kind {
        ParameterKind::RandomHex { length } => {
            if *length == 0 {
                return Err(LabError::invalid(name, type_name, "length must be > 0"));
            }
            if *length > DIGEST_HEX_LEN {
                return Err(LabError::invalid(
                    name,
                    type_name,
                    format!("length {length} exceeds {DIGEST_HEX_LEN} hex chars"),
                ));
            }
        }
        ParameterKind::RandomInt { min, max } => {
            if max < min {
                return Err(LabError::invalid(
                    name,
                    type_name,
                    format!("max {max} is less than min {min}"),
                ));
            }
        }
        ParameterKind::Choice { choices } => {
            if choices.is_empty() {
                return Err(LabError::invalid(name, type_name, "choices must be non-empty"));
            }
        }
    }
    Ok(())
}

/// Derive values for validated declarations.
///
/// The mapping starts with `SEED`; a declaration named `SEED` replaces it.
pub fn generate_values(decls: &[ParameterDecl], seed: &str) -> Result<ParameterValues, LabError> {
    let mut values = ParameterValues::new();
    values.insert(SEED_KEY.to_string(), ParamValue::Text(seed.to_string()));
    for decl in decls {
        let value = derive_value(decl, seed)?;
        values.insert(decl.name.clone(), value);
    }
    Ok(values)
}

/// Validate a lab's declarations and derive all of its parameter values.
pub fn generate_parameters(
    lab: &LabDefinition,
    seed: &str,
    options: &GenerateOptions,
) -> Result<ParameterValues, LabError> {
    let validated = validate_declarations(&lab.parameters, options)?;
    generate_values(&validated.decls, seed)
}

fn derive_value(decl: &ParameterDecl, seed: &str) -> Result<ParamValue, LabError> {
    check_kind(&decl.name, &decl.kind)?;
    let label = decl.name.as_str();
    match &decl.kind {
        ParameterKind::RandomHex { length } => Ok(ParamValue::Text(derive_hex(seed, label, *length)?)),
        ParameterKind::RandomInt { min, max } => {
            let raw = derive_uint(seed, label, INT_PREFIX_BYTES)?;
            Ok(ParamValue::Int(reduce_into_range(raw, *min, *max)))
        }
        ParameterKind::Choice { choices } => {
            let raw = derive_uint(seed, label, CHOICE_PREFIX_BYTES)?;
            let index = (raw % choices.len() as u64) as usize;
            Ok(choices[index].clone())
        }
    }
}

/// `min + raw % (max - min + 1)`, computed in `i128` so full-width ranges
/// cannot overflow. Requires `min <= max`.
fn reduce_into_range(raw: u64, min: i64, max: i64) -> i64 {
    let width = i128::from(max) - i128::from(min) + 1;
    let offset = i128::from(raw) % width;
    (i128::from(min) + offset) as i64
}
