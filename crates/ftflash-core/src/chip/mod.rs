//! Controller profiles
//!
//! This module provides the per-variant constants (timings, bootloader
//! identity, quirks) and the static table of supported controllers.

mod database;
mod types;

pub use database::*;
pub use types::*;
