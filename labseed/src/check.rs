//! `labseed check`: evaluate a submission against a lab's validators.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::params::{GenerateOptions, generate_parameters};
use crate::core::render::render_template;
use crate::core::types::LabDefinition;
use crate::core::verify::{ValidatorSpec, flag_contains, staged_path};

/// Outcome of a single validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// JSON record printed by `labseed check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub lab: String,
    pub passed: bool,
    pub results: Vec<ValidatorResult>,
}

/// Run every validator of `lab` against `submission` for `seed`.
///
/// Parameters are regenerated from the seed, so the expectation always matches
/// what `labseed expand` produced for the same session. `file_exists`
/// validators need a `staging_dir`.
pub fn check_submission(
    lab: &LabDefinition,
    seed: &str,
    submission: &str,
    staging_dir: Option<&Path>,
    options: &GenerateOptions,
) -> Result<CheckOutcome> {
    if lab.validators.is_empty() {
        bail!("lab {} declares no validators", lab.id);
    }
    let values = generate_parameters(lab, seed, options)
        .with_context(|| format!("generate parameters for lab {}", lab.id))?;

    let mut results = Vec::with_capacity(lab.validators.len());
    for validator in &lab.validators {
        let result = match validator {
            ValidatorSpec::FlagContains { value } => ValidatorResult {
                kind: validator.type_name().to_string(),
                passed: flag_contains(submission, &render_template(value, &values)),
                path: None,
            },
            ValidatorSpec::FileExists { path } => {
                let Some(staging_dir) = staging_dir else {
                    bail!("lab {}: file_exists validator requires a staging directory", lab.id);
                };
                let target = staged_path(staging_dir, path, &values);
                ValidatorResult {
                    kind: validator.type_name().to_string(),
                    passed: target.exists(),
                    path: Some(target.display().to_string()),
                }
            }
        };
        debug!(lab = %lab.id, validator = %result.kind, passed = result.passed, "validator evaluated");
        results.push(result);
    }

    let passed = results.iter().all(|result| result.passed);
    Ok(CheckOutcome {
        lab: lab.id.clone(),
        passed,
        results,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::derive::derive_hex;
    use crate::test_support::{hex_param, lab_with};

    fn lab_with_validators(validators: Vec<ValidatorSpec>) -> LabDefinition {
        let mut lab = lab_with(vec![hex_param("FLAG", Some(16))], &[("flag", "OMNIHACK{{{FLAG}}}")]);
        lab.validators = validators;
        lab
    }

    #[test]
    fn flag_validator_accepts_derived_value() {
        let lab = lab_with_validators(vec![ValidatorSpec::FlagContains {
            value: "{{FLAG}}".to_string(),
        }]);
        let flag = derive_hex("abc", "FLAG", 16).expect("derive");
        let submission = format!("  found it: OMNIHACK{{{flag}}}\n");
        let outcome =
            check_submission(&lab, "abc", &submission, None, &GenerateOptions::default())
                .expect("check");
        assert!(outcome.passed);

        let wrong = check_submission(&lab, "other-seed", &submission, None, &GenerateOptions::default())
            .expect("check");
        assert!(!wrong.passed);
    }

    #[test]
    fn file_validator_resolves_under_staging() {
        let temp = tempfile::tempdir().expect("tempdir");
        let lab = lab_with_validators(vec![ValidatorSpec::FileExists {
            path: "/loot/{{FLAG}}.txt".to_string(),
        }]);
        let options = GenerateOptions::default();

        let before = check_submission(&lab, "abc", "", Some(temp.path()), &options).expect("check");
        assert!(!before.passed);

        let flag = derive_hex("abc", "FLAG", 16).expect("derive");
        fs::create_dir_all(temp.path().join("loot")).expect("mkdir");
        fs::write(temp.path().join(format!("loot/{flag}.txt")), "x").expect("write");
        let after = check_submission(&lab, "abc", "", Some(temp.path()), &options).expect("check");
        assert!(after.passed);
        assert!(after.results[0].path.as_deref().is_some_and(|p| p.ends_with(".txt")));
    }

    #[test]
    fn file_validator_without_staging_is_an_error() {
        let lab = lab_with_validators(vec![ValidatorSpec::FileExists {
            path: "x".to_string(),
        }]);
        assert!(check_submission(&lab, "abc", "", None, &GenerateOptions::default()).is_err());
    }

    #[test]
    fn all_validators_must_pass() {
        let lab = lab_with_validators(vec![
            ValidatorSpec::FlagContains {
                value: "{{FLAG}}".to_string(),
            },
            ValidatorSpec::FlagContains {
                value: "never-present".to_string(),
            },
        ]);
        let flag = derive_hex("abc", "FLAG", 16).expect("derive");
        let outcome = check_submission(&lab, "abc", &flag, None, &GenerateOptions::default())
            .expect("check");
        assert!(outcome.results[0].passed);
        assert!(!outcome.results[1].passed);
        assert!(!outcome.passed);
    }

    #[test]
    fn lab_without_validators_is_an_error() {
        let lab = lab_with(vec![], &[]);
        assert!(check_submission(&lab, "abc", "x", None, &GenerateOptions::default()).is_err());
    }
}
