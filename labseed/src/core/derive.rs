//! Seeded value derivation.
//!
//! Flags and parameters are derived from `sha256(seed ":" label)`. Varying the
//! label yields independent streams from one seed. The binary marker digest is
//! `sha256(seed)` with no label.

use sha2::{Digest, Sha256};

use crate::core::error::LabError;

/// Length of a full hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Separator between seed and label in the hashed preimage.
pub const LABEL_SEPARATOR: u8 = b':';

/// Label used by `labseed flag` when none is configured.
pub const DEFAULT_FLAG_LABEL: &str = "OMNIHACK";

/// Hex characters carried inside a flag token's braces.
pub const FLAG_HEX_LEN: usize = 16;

/// Token appended ahead of the mutation digest.
pub const MUTATION_MARKER: &[u8] = b"\n#OMNIHACK_MUTATION#\n";

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(*part);
    }
    hasher.finalize().into()
}

fn digest(seed: &str, label: &str) -> [u8; 32] {
    sha256(&[
        seed.as_bytes(),
        std::slice::from_ref(&LABEL_SEPARATOR),
        label.as_bytes(),
    ])
}

/// Full 64-char hex digest for `(seed, label)`.
pub fn digest_hex(seed: &str, label: &str) -> String {
    hex::encode(digest(seed, label))
}

/// Leftmost `len` hex characters of the `(seed, label)` digest.
pub fn derive_hex(seed: &str, label: &str, len: usize) -> Result<String, LabError> {
    if len > DIGEST_HEX_LEN {
        return Err(LabError::DerivationTooLong {
            requested: len,
            available: DIGEST_HEX_LEN,
        });
    }
    let mut value = digest_hex(seed, label);
    value.truncate(len);
    Ok(value)
}

/// Big-endian integer from the leading `bytes` digest bytes.
///
/// Equivalent to parsing the leftmost `2 * bytes` hex characters as base 16.
pub fn derive_uint(seed: &str, label: &str, bytes: usize) -> Result<u64, LabError> {
    if bytes > std::mem::size_of::<u64>() {
        return Err(LabError::DerivationTooLong {
            requested: bytes * 2,
            available: std::mem::size_of::<u64>() * 2,
        });
    }
    let raw = digest(seed, label);
    Ok(raw[..bytes]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Format `label{<16 hex>}` derived under `label`.
pub fn derive_flag(seed: &str, label: &str) -> String {
    let mut value = digest_hex(seed, label);
    value.truncate(FLAG_HEX_LEN);
    format!("{label}{{{value}}}")
}

/// Hex digest of the seed alone, with no label. Identifies the session in
/// mutated binaries.
pub fn seed_digest_hex(seed: &str) -> String {
    hex::encode(sha256(&[seed.as_bytes()]))
}

/// Marker block appended to mutated binaries: marker token then seed digest.
pub fn mutation_trailer(seed: &str) -> Vec<u8> {
    let digest = seed_digest_hex(seed);
    let mut trailer = Vec::with_capacity(MUTATION_MARKER.len() + digest.len());
    trailer.extend_from_slice(MUTATION_MARKER);
    trailer.extend_from_slice(digest.as_bytes());
    trailer
}
