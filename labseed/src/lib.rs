//! Deterministic per-session artifacts for isolated training labs.
//!
//! A single session seed drives everything a lab instance needs: a flag token,
//! parameter values rendered into text artifacts, and a marked copy of a
//! binary. Equal seeds reproduce byte-identical output. The crate keeps a
//! strict split:
//!
//! - **[`core`]**: Pure derivation, parameter generation and template
//!   substitution. No I/O, no logging.
//! - **[`io`]**: Config, lab document loading, artifact writing and binary
//!   mutation.
//!
//! Orchestration modules ([`flag`], [`expand`], [`check`]) combine the two to
//! implement CLI commands.

pub mod check;
pub mod core;
pub mod exit_codes;
pub mod expand;
pub mod flag;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
