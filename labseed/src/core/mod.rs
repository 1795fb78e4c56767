//! Deterministic, pure logic for lab generation.
//!
//! Core modules perform no I/O and no logging. Every output is a function of
//! the seed and the lab declaration alone.

pub mod derive;
pub mod error;
pub mod params;
pub mod render;
pub mod types;
pub mod verify;
