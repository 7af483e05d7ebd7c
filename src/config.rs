//! Engine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default cap on the number of cells a range may span (1024 x 1024).
pub const DEFAULT_MAX_CELLS: u64 = 1 << 20;

/// Configuration for an engine instance.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points granted to a newly registered player.
    pub starting_points: u32,
    /// Largest number of cells a range may span.
    pub max_cells: u64,
    /// Names that receive the admin role on registration.
    pub admin_names: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_points: 0,
            max_cells: DEFAULT_MAX_CELLS,
            admin_names: Vec::new(),
        }
    }
}

/// Error type for loading a configuration file.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json(&text)
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError {
            reason: e.to_string(),
        })
    }

    /// Check whether `name` is configured as an admin.
    #[must_use]
    pub fn is_admin_name(&self, name: &str) -> bool {
        self.admin_names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "starting_points": 5 }"#).unwrap();
        assert_eq!(config.starting_points, 5);
        assert_eq!(config.max_cells, DEFAULT_MAX_CELLS);
        assert!(config.admin_names.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let err = EngineConfig::from_json("{ starting_points: }").unwrap_err();
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "admin_names": ["root"] }"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert!(config.is_admin_name("root"));
        assert!(!config.is_admin_name("ada"));
    }
}
