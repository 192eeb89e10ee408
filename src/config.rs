//! Application configuration
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::translate::BackendPreset;

/// Opening assistant message
pub const DEFAULT_GREETING: &str =
    "Describe the properties you want to see (eg 'High risk timber in Glasgow').";

/// Configuration for a tablechat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Translation backend preset
    pub backend: BackendPreset,

    /// Sampling temperature sent with each request
    pub temperature: f32,

    /// Upper bound on one backend round trip
    pub request_timeout_secs: u64,

    /// Path of the base dataset CSV
    pub dataset: PathBuf,

    /// Seed message of the conversation log
    pub greeting: String,

    /// Simulated latency of the sample query
    pub sample_latency_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreset::default(),
            temperature: 0.1,
            request_timeout_secs: 60,
            dataset: PathBuf::from("properties.csv"),
            greeting: DEFAULT_GREETING.to_string(),
            sample_latency_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, data).with_context(|| format!("Failed to write config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"backend": "gemini", "request_timeout_secs": 5}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.backend, BackendPreset::Gemini);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let config = AppConfig {
            backend: BackendPreset::Azure,
            ..AppConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }
}
