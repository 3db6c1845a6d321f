//! Configuration management for `wordswap-core`.
//!
//! Holds the engine tunables and the quotas shared by the rule editors and the
//! stores. Settings deserialize from YAML or JSON (YAML is a superset).
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::Result;

/// Upper bound on the number of rules a snapshot may hold.
pub const MAX_RULES: usize = 500;

/// Byte quota for everything a store holds, measured as serialized JSON.
pub const MAX_STORE_BYTES: usize = 5 * 1024 * 1024;

/// Default wall-clock allowance for substituting within one text node.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 100;

/// Size limit handed to the regex compiler for each combined matcher.
pub const MAX_COMPILED_SIZE: usize = 10 * (1 << 20);

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Per-text-node budget in milliseconds.
    pub time_budget_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
        }
    }
}

impl EngineSettings {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Loads settings from a YAML or JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine settings from: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let settings = Self::parse(&text)?;
        debug!("Time budget set to {} ms.", settings.time_budget_ms);
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = EngineSettings::parse("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.time_budget(), Duration::from_millis(100));
    }

    #[test]
    fn parses_yaml_and_json() {
        assert_eq!(EngineSettings::parse("time_budget_ms: 25").unwrap().time_budget_ms, 25);
        assert_eq!(EngineSettings::parse(r#"{"time_budget_ms": 40}"#).unwrap().time_budget_ms, 40);
    }
}
