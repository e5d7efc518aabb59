//! Tooling for the armor stat definitions and asset files of the combat mod.
//!
//! [`stats`] converts the armor stats JSON to an editable TSV table and back.
//! [`domains`] prefixes bare texture paths in shape files with an asset domain.

pub mod domains;
pub mod stats;

pub(crate) mod utils;
