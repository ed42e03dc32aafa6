//! Rule tables for the Staffing Compliance Engine.
//!
//! This module loads the static regulatory configuration from YAML files:
//! FTE weighting per work style, baseline ratios per block, the minimum
//! staff floor, and the catalog of fee additions with their staffing
//! requirements.
//!
//! # Example
//!
//! ```no_run
//! use staffing_compliance::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Loaded rules: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AdditionDefinition, AdditionsConfig, BlockRatioRule, FteOverride, FteRules, FteWeighting,
    RuleMetadata, RuleTables, RulesConfig, StaffingRules,
};
