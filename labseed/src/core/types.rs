//! Lab declaration model and generated value types.
//!
//! Lab documents are deserialized into the raw records below and only then
//! validated into typed [`ParameterDecl`]s, so an unknown `type` surfaces as a
//! [`LabError::UnsupportedType`](crate::core::error::LabError) naming the
//! parameter instead of an opaque parse failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::verify::ValidatorSpec;

/// A declarative bundle of parameters, artifact templates and validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hints: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ParameterRecord>,
    /// Artifact name -> flat template text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validators: Vec<ValidatorSpec>,
}

/// Treat an explicit `null` (e.g. a bare `artifacts:` key) like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parameter declaration exactly as written in the lab document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// `null` entries are kept so validation can name them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Option<ParamValue>>>,
}

/// Validated parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub name: String,
    pub kind: ParameterKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    RandomHex { length: usize },
    /// Inclusive range, `min <= max`.
    RandomInt { min: i64, max: i64 },
    /// Non-empty candidate list.
    Choice { choices: Vec<ParamValue> },
}

impl ParameterKind {
    pub const RANDOM_HEX: &'static str = "random_hex";
    pub const RANDOM_INT: &'static str = "random_int";
    pub const CHOICE: &'static str = "choice";

    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::RandomHex { .. } => Self::RANDOM_HEX,
            ParameterKind::RandomInt { .. } => Self::RANDOM_INT,
            ParameterKind::Choice { .. } => Self::CHOICE,
        }
    }
}

/// A derived parameter value (or a choice candidate).
///
/// Choice candidates may be any scalar; they are rendered in their text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(true) => f.write_str("True"),
            ParamValue::Bool(false) => f.write_str("False"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value:?}"),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

/// Parameter name -> derived value. Always contains `SEED`.
pub type ParameterValues = BTreeMap<String, ParamValue>;

/// Artifact name -> rendered text.
pub type RenderedArtifacts = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_value_displays_raw_text() {
        assert_eq!(ParamValue::from("abc").to_string(), "abc");
        assert_eq!(ParamValue::from(-42_i64).to_string(), "-42");
    }

    #[test]
    fn lab_parses_from_yaml_with_defaults() {
        let lab: LabDefinition = serde_yaml::from_str(
            "id: demo\nparameters:\n  - name: PORT\n    type: random_int\n    min: 1000\n    max: 2000\n  - name: USER\n    type: choice\n    choices: [alice, 7]\n",
        )
        .expect("parse");
        assert_eq!(lab.id, "demo");
        assert!(lab.artifacts.is_empty());
        assert!(lab.validators.is_empty());
        assert_eq!(lab.parameters[0].kind.as_deref(), Some("random_int"));
        assert_eq!(
            lab.parameters[1].choices,
            Some(vec![Some(ParamValue::from("alice")), Some(ParamValue::from(7_i64))])
        );
    }

    #[test]
    fn choices_accept_any_scalar() {
        let lab: LabDefinition = serde_yaml::from_str(
            "id: mixed\nparameters:\n  - name: PICK\n    type: choice\n    choices: [true, 1.5, 2.0, ~, x]\n",
        )
        .expect("parse");
        let choices = lab.parameters[0].choices.clone().expect("choices");
        assert_eq!(
            choices,
            vec![
                Some(ParamValue::Bool(true)),
                Some(ParamValue::Float(1.5)),
                Some(ParamValue::Float(2.0)),
                None,
                Some(ParamValue::from("x")),
            ]
        );
        let rendered: Vec<String> = choices.iter().flatten().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["True", "1.5", "2.0", "x"]);
    }

    #[test]
    fn null_sections_read_as_empty() {
        let lab: LabDefinition =
            serde_yaml::from_str("id: bare\nparameters:\nartifacts:\n").expect("parse");
        assert!(lab.parameters.is_empty());
        assert!(lab.artifacts.is_empty());
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let mut values = ParameterValues::new();
        values.insert("PORT".to_string(), ParamValue::Int(8080));
        values.insert("SEED".to_string(), ParamValue::from("abc"));
        let json = serde_json::to_string(&values).expect("serialize");
        assert_eq!(json, r#"{"PORT":8080,"SEED":"abc"}"#);
    }
}
