//! Application state for the Staffing Compliance Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, RuleTables};

/// Shared application state.
///
/// Holds the rule tables loaded at startup. Request handlers only read it.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the loaded rule tables.
    pub fn rules(&self) -> &RuleTables {
        self.config.tables()
    }
}
