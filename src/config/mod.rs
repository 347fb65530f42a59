//! Static jurisdiction rule bundles.
//!
//! A jurisdiction identifier (a labor-law region code) maps to a known
//! feature bundle: meal/rest break rules, predictive-scheduling notice
//! hours, and daily/weekly overtime thresholds. The table is versioned
//! data shipped with the engine, never computed; an operational override
//! can be loaded from a YAML file instead.

mod loader;
mod types;

pub use loader::JurisdictionTable;
pub use types::{JurisdictionConfig, JurisdictionRules, apply_jurisdiction_rules};
