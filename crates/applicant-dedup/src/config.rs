//! Configuration for duplicate detection
//!
//! The threshold is a tunable product parameter, not a derived value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DedupError, Result};
use crate::similarity::DEFAULT_THRESHOLD;

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Minimum name similarity (inclusive) for two records to be linked
    pub threshold: f64,
    /// Also compare with token order reversed ("Last First")
    pub reverse_tokens: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            reverse_tokens: true,
        }
    }
}

impl DedupConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a different threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file; `.json` is JSON, anything else TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(DedupError::InvalidConfig(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DedupConfig::default();
        assert_eq!(config.threshold, 0.70);
        assert!(config.reverse_tokens);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DedupConfig::with_threshold(0.8);
        let json = config.to_json().unwrap();
        assert_eq!(DedupConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_toml_partial() {
        let config = DedupConfig::from_toml("threshold = 0.9\n").unwrap();
        assert_eq!(config.threshold, 0.9);
        assert!(config.reverse_tokens);
    }

    #[test]
    fn test_out_of_range() {
        assert!(DedupConfig::with_threshold(1.5).validate().is_err());
        assert!(DedupConfig::with_threshold(-0.1).validate().is_err());
        assert!(DedupConfig::with_threshold(f64::NAN).validate().is_err());
        assert!(matches!(
            DedupConfig::from_toml("threshold = 2.0"),
            Err(DedupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("dedup.toml");
        std::fs::write(&toml_path, "threshold = 0.75\nreverse_tokens = false\n").unwrap();
        let config = DedupConfig::load(&toml_path).unwrap();
        assert_eq!(config.threshold, 0.75);
        assert!(!config.reverse_tokens);

        let json_path = dir.path().join("dedup.json");
        std::fs::write(&json_path, r#"{"threshold": 0.6}"#).unwrap();
        assert_eq!(DedupConfig::load(&json_path).unwrap().threshold, 0.6);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            DedupConfig::load("/nonexistent/dedup.toml"),
            Err(DedupError::Io(_))
        ));
    }
}
