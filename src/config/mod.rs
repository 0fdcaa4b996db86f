//! Configuration loading and management for Graph Validator
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to a checked `ValidatorConfig`
//! - Defaults reproduce plain recursive validation with `.`-joined paths
//! - Invalid settings are rejected at load time, never during a traversal

use crate::domain::violations::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a recursive validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Joins a property name to the member paths of its child
    pub separator: String,
    /// Maximum descent below the root (unbounded if not set)
    pub max_depth: Option<usize>,
    /// Whether elements of collection properties are validated
    pub descend_collections: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            max_depth: None,
            descend_collections: true,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GraphResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            GraphError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            GraphError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> GraphResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GraphError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can drive a traversal
    pub fn validate(&self) -> GraphResult<()> {
        if self.separator.is_empty() {
            return Err(GraphError::config("separator must not be empty"));
        }

        if self.max_depth == Some(0) {
            return Err(GraphError::config(
                "max_depth must be at least 1; omit it for unbounded descent",
            ));
        }

        Ok(())
    }

    /// Set the maximum descent below the root
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the path separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert_eq!(config.separator, ".");
        assert_eq!(config.max_depth, None);
        assert!(config.descend_collections);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let config = ValidatorConfig::load_from_str("max_depth: 16\n").unwrap();

        assert_eq!(config.max_depth, Some(16));
        assert_eq!(config.separator, ".");
        assert!(config.descend_collections);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        assert!(ValidatorConfig::load_from_str("separator: ''\n").is_err());
        assert!(ValidatorConfig::load_from_str("max_depth: 0\n").is_err());
        assert!(ValidatorConfig::load_from_str("max_depth: [1, 2]\n").is_err());
    }

    #[test]
    fn test_load_from_file() -> GraphResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("validator.yaml");

        let config = ValidatorConfig::default()
            .with_separator("/")
            .with_max_depth(4);
        fs::write(&config_file, serde_yaml::to_string(&config).unwrap()).unwrap();

        let loaded = ValidatorConfig::load_from_file(&config_file)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ValidatorConfig::load_from_file("/nonexistent/validator.yaml").unwrap_err();
        assert!(matches!(err, GraphError::Configuration { .. }));
    }
}
