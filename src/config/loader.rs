//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading staffing rule
//! tables from YAML files.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{AdditionStaffRequirement, StaffingRatio};

use super::types::{AdditionDefinition, AdditionsConfig, RuleMetadata, RuleTables, RulesConfig};

/// Loads and provides access to staffing rule tables.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── rules.yaml      # Metadata, FTE weighting, baseline ratios and floor
/// └── additions.yaml  # Fee addition catalog
/// ```
///
/// # Example
///
/// ```no_run
/// use staffing_compliance::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let requirement = loader.requirement("specialist_support").unwrap();
/// println!("Addition: {}", requirement.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: RuleTables,
}

impl ConfigLoader {
    /// Loads rule tables from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The addition catalog lists the same code twice
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rules_path = path.join("rules.yaml");
        let rules = Self::load_yaml::<RulesConfig>(&rules_path)?;

        let additions_path = path.join("additions.yaml");
        let additions = Self::load_yaml::<AdditionsConfig>(&additions_path)?;

        let mut seen = BTreeSet::new();
        for addition in &additions.additions {
            let code = &addition.requirement.addition_code;
            if !seen.insert(code.clone()) {
                return Err(EngineError::ConfigParseError {
                    path: additions_path.display().to_string(),
                    message: format!("duplicate addition code '{}'", code),
                });
            }
        }

        let tables = RuleTables::new(rules.metadata, rules.fte, rules.staffing, additions.additions);
        Ok(Self { tables })
    }

    /// Wraps already-built rule tables.
    pub fn from_tables(tables: RuleTables) -> Self {
        Self { tables }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying rule tables.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RuleMetadata {
        self.tables.metadata()
    }

    /// Gets an addition definition by its code.
    ///
    /// # Returns
    ///
    /// Returns the definition if found, or `AdditionNotFound`.
    pub fn get_addition(&self, code: &str) -> EngineResult<&AdditionDefinition> {
        self.tables
            .addition(code)
            .ok_or_else(|| EngineError::AdditionNotFound {
                code: code.to_string(),
            })
    }

    /// Gets the staffing requirement of an addition by its code.
    pub fn requirement(&self, code: &str) -> EngineResult<AdditionStaffRequirement> {
        self.get_addition(code).map(|a| a.requirement.clone())
    }

    /// Gets the baseline ratio for a block id.
    pub fn ratio_for_block(&self, block_id: &str) -> StaffingRatio {
        self.tables.staffing().ratio_for_block(block_id)
    }
}
