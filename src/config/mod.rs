//! Configuration loading for resolver generation

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::resolvers::formula::DEFAULT_LEDGER_SHEET;

/// Default cap on nested create payload depth
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Settings applied when building a resolver map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Deepest level of nested objects accepted by a create mutation
    ///
    /// The top-level input is depth 0.
    pub max_nesting_depth: usize,

    /// Sheet named in emitted relationship formulas
    pub ledger_sheet: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            ledger_sheet: DEFAULT_LEDGER_SHEET.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.ledger_sheet.is_empty() {
            anyhow::bail!("ledger_sheet must not be empty");
        }
        Ok(config)
    }

    /// Override the nesting depth (builder style)
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
