//! User configuration.
//!
//! Read from `<config dir>/smartcalc/config.toml` when present. Every key is
//! optional; anything missing falls back to the defaults below.

use crate::calculator::NumberFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub evaluator: EvaluatorConfig,
}

/// How results and history are shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of entries the console history command shows
    pub history_limit: usize,
    /// Decimal places kept for non-integral results
    pub precision: usize,
    /// Group digits with commas
    pub thousand_separators: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            precision: 12,
            thousand_separators: false,
        }
    }
}

/// Evaluator behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Run the phrase normalizer before console evaluation
    pub phrases: bool,
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("smartcalc").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// location is tried and anything wrong with it yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => Ok(match Self::default_path() {
                Some(path) => Self::load_or_default(&path),
                None => Self::default(),
            }),
        }
    }

    /// Load `path`, falling back to the defaults if it is missing or broken.
    fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file found, using defaults");
            return Self::default();
        }
        match Self::load_file(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring config file, using defaults: {:#}", err);
                Self::default()
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML")
    }

    pub fn number_format(&self) -> NumberFormat {
        NumberFormat {
            precision: self.display.precision,
            thousand_separators: self.display.thousand_separators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.history_limit, 50);
        assert_eq!(config.display.precision, 12);
        assert!(!config.evaluator.phrases);
        assert_eq!(config.number_format(), NumberFormat::default());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse("[display]\nprecision = 4\n").unwrap();
        assert_eq!(config.display.precision, 4);
        assert_eq!(config.display.history_limit, 50);
        assert!(!config.evaluator.phrases);
    }

    #[test]
    fn test_full_file() {
        let config = Config::parse(
            r#"
            [display]
            history_limit = 10
            precision = 6
            thousand_separators = true

            [evaluator]
            phrases = true
            "#,
        )
        .unwrap();
        assert_eq!(config.display.history_limit, 10);
        assert!(config.display.thousand_separators);
        assert!(config.evaluator.phrases);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file() {
        assert!(Config::parse("[display]\nprecision = \"high\"\n").is_err());
    }

    #[test]
    fn test_broken_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display\nprecision = ").unwrap();

        assert_eq!(Config::load_or_default(&path), Config::default());
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_default_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[evaluator]\nphrases = true\n").unwrap();

        assert!(Config::load_or_default(&path).evaluator.phrases);
        assert!(Config::load(Some(&path)).unwrap().evaluator.phrases);
        assert_eq!(
            Config::load_or_default(&dir.path().join("missing.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let missing = Path::new("/nonexistent/smartcalc/config.toml");
        assert!(Config::load(Some(missing)).is_err());
    }
}
