//! Report renderers for a resolved inventory.
//!
//! - [`terminal`] — summary box, per-license table, and compliance findings;
//!   respects `--verbose` / `--quiet`.
//! - [`json`] — pruned packages or license sections as pretty JSON.

pub mod json;
pub mod terminal;
