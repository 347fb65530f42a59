//! Jurisdiction rule table loading.
//!
//! The table ships embedded in the binary; deployments that need a newer
//! revision than the shipped one can load a YAML file from disk instead.

use std::fs;
use std::path::Path;

use crate::config::types::JurisdictionConfig;
use crate::config::types::JurisdictionRules;
use crate::error::{EngineError, EngineResult};

/// The rule table shipped with this build of the engine.
const BUILTIN_RULES: &str = include_str!("../../config/jurisdictions.yaml");

/// The loaded jurisdiction rule table.
#[derive(Debug, Clone)]
pub struct JurisdictionTable {
    config: JurisdictionConfig,
}

impl JurisdictionTable {
    /// Loads the rule table embedded in the binary.
    ///
    /// A parse failure here means the shipped data file is broken, which
    /// the test suite catches before release.
    pub fn builtin() -> EngineResult<Self> {
        let config = serde_yaml::from_str(BUILTIN_RULES).map_err(|e| {
            EngineError::JurisdictionConfigError {
                path: "<builtin>".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { config })
    }

    /// Loads a rule table from a YAML file on disk.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| EngineError::JurisdictionConfigError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config =
            serde_yaml::from_str(&raw).map_err(|e| EngineError::JurisdictionConfigError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { config })
    }

    /// The data version of the loaded table.
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Looks up the rule bundle for a jurisdiction code.
    pub fn rules(&self, code: &str) -> Option<&JurisdictionRules> {
        self.config.jurisdictions.get(code)
    }

    /// All known jurisdiction codes, unordered.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.config.jurisdictions.keys().map(String::as_str)
    }
}
