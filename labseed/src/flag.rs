//! `labseed flag`: deterministic flag tokens.

use serde::{Deserialize, Serialize};

use crate::core::derive::derive_flag;

/// JSON record printed by `labseed flag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub seed: String,
    pub flag: String,
}

impl FlagRecord {
    pub fn derive(seed: &str, label: &str) -> Self {
        Self {
            seed: seed.to_string(),
            flag: derive_flag(seed, label),
        }
    }
}
