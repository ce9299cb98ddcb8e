//! TOML configuration for the import pipeline.
//!
//! Every section and key is optional:
//!
//! ```toml
//! # fra-ingest.toml
//! [validation]
//! min_frequency_hz = 20.0
//! max_frequency_hz = 2000000.0
//!
//! [normalization]
//! resample = false
//! target_points = 800
//!
//! [import]
//! max_file_size_mb = 100
//! header_sniff_bytes = 4096
//! ```
//!
//! Deployments can override the frequency bounds and upload limit through
//! `FRA_MIN_FREQUENCY_HZ`, `FRA_MAX_FREQUENCY_HZ` and `FRA_MAX_UPLOAD_SIZE_MB`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::normalization::NormalizationOptions;
use crate::parsers::HEADER_SNIFF_BYTES;
use crate::validation::ValidationConfig;

/// Environment variable overriding [`ValidationConfig::min_frequency_hz`]
pub const ENV_MIN_FREQUENCY_HZ: &str = "FRA_MIN_FREQUENCY_HZ";

/// Environment variable overriding [`ValidationConfig::max_frequency_hz`]
pub const ENV_MAX_FREQUENCY_HZ: &str = "FRA_MAX_FREQUENCY_HZ";

/// Environment variable overriding [`ImportConfig::max_file_size_mb`]
pub const ENV_MAX_UPLOAD_SIZE_MB: &str = "FRA_MAX_UPLOAD_SIZE_MB";

/// Errors loading or checking a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range or unparseable
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Config key or environment variable
        key: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// File intake limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Files larger than this are rejected before detection
    pub max_file_size_mb: u64,
    /// Bytes handed to parser detection
    pub header_sniff_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            header_sniff_bytes: HEADER_SNIFF_BYTES,
        }
    }
}

impl ImportConfig {
    /// Size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Validation thresholds
    pub validation: ValidationConfig,
    /// Normalization switches
    pub normalization: NormalizationOptions,
    /// Intake limits
    pub import: ImportConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `FRA_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `FRA_*` overrides from an arbitrary lookup
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&lookup, ENV_MIN_FREQUENCY_HZ)? {
            self.validation.min_frequency_hz = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_MAX_FREQUENCY_HZ)? {
            self.validation.max_frequency_hz = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_MAX_UPLOAD_SIZE_MB)? {
            self.import.max_file_size_mb = v;
        }
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ValidationConfig {
            min_frequency_hz: min,
            max_frequency_hz: max,
        } = self.validation;

        for (key, value) in [("validation.min_frequency_hz", min), ("validation.max_frequency_hz", max)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(key, format!("{value} must be a positive number")));
            }
        }
        if min >= max {
            return Err(ConfigError::invalid(
                "validation.min_frequency_hz",
                format!("{min} must be below max_frequency_hz ({max})"),
            ));
        }
        if self.normalization.target_points < 2 {
            return Err(ConfigError::invalid(
                "normalization.target_points",
                "at least 2 points are needed for a grid",
            ));
        }
        if self.import.header_sniff_bytes == 0 {
            return Err(ConfigError::invalid("import.header_sniff_bytes", "must be non-zero"));
        }
        Ok(())
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::invalid(key, format!("{raw:?}: {e}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [validation]
            min_frequency_hz = 10.0
            max_frequency_hz = 1000000.0

            [normalization]
            resample = true
            target_points = 400

            [import]
            max_file_size_mb = 25
        "#;

        let config = PipelineConfig::from_str(toml).unwrap();
        assert_eq!(config.validation.min_frequency_hz, 10.0);
        assert_eq!(config.validation.max_frequency_hz, 1_000_000.0);
        assert!(config.normalization.resample);
        assert_eq!(config.normalization.target_points, 400);
        assert_eq!(config.import.max_file_size_mb, 25);
        assert_eq!(config.import.header_sniff_bytes, HEADER_SNIFF_BYTES);
    }

    #[test]
    fn test_partial_config() {
        let config = PipelineConfig::from_str("[validation]\nmin_frequency_hz = 5.0\n").unwrap();
        assert_eq!(config.validation.min_frequency_hz, 5.0);
        assert_eq!(config.validation.max_frequency_hz, 2_000_000.0);
        assert!(!config.normalization.resample);
    }

    #[test]
    fn test_empty_config() {
        let config = PipelineConfig::from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_toml() {
        let err = PipelineConfig::from_str("[validation]\nmin_frequency_hz = \"low\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[import]\nmax_file_size_mb = 7").unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.import.max_file_size_mb, 7);
        assert_eq!(config.import.max_file_size_bytes(), 7 * 1024 * 1024);

        let missing = PipelineConfig::from_file(Path::new("/nonexistent/fra-ingest.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PipelineConfig::default();
        config
            .apply_env_overrides_from(env(&[
                (ENV_MIN_FREQUENCY_HZ, "10"),
                (ENV_MAX_UPLOAD_SIZE_MB, " 250 "),
            ]))
            .unwrap();

        assert_eq!(config.validation.min_frequency_hz, 10.0);
        assert_eq!(config.validation.max_frequency_hz, 2_000_000.0);
        assert_eq!(config.import.max_file_size_mb, 250);
    }

    #[test]
    fn test_bad_env_override() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_env_overrides_from(env(&[(ENV_MAX_FREQUENCY_HZ, "two million")]))
            .unwrap_err();

        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, ENV_MAX_FREQUENCY_HZ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = PipelineConfig::default();
        config.validation.min_frequency_hz = 3_000_000.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.validation.max_frequency_hz = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.normalization.target_points = 1;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.import.header_sniff_bytes = 0;
        assert!(config.validate().is_err());
    }
}
