//! I/O helpers for labseed commands.

pub mod artifacts;
pub mod config;
pub mod lab_store;
pub mod mutate;
