//! Configuration types for the momentum engine.
//!
//! This module defines the configuration schema, including the LLM
//! provider settings, journal storage settings, and UI preferences.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration for momentum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Journal storage settings.
    #[serde(default)]
    pub journal: JournalConfig,

    /// UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name ("ollama" or "openrouter").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for hosted providers.
    #[serde(default)]
    pub api_key: String,

    /// Model to use (e.g. "llama3").
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum tokens for a response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_provider() -> String {
    "ollama".into()
}

fn default_model_name() -> String {
    "llama3".into()
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".into()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model_name: default_model_name(),
            endpoint: default_endpoint(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Journal storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory holding journal entries.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Daily word count goal (750 words is three pages).
    #[serde(default = "default_word_count_goal")]
    pub word_count_goal: usize,

    /// Autosave interval in seconds.
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval: u64,
}

fn default_storage_dir() -> PathBuf {
    data_dir().join("journals")
}

fn default_word_count_goal() -> usize {
    750
}

/// Longest accepted autosave interval (one day).
pub const MAX_AUTOSAVE_INTERVAL: u64 = 24 * 60 * 60;

fn default_autosave_interval() -> u64 {
    30
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            word_count_goal: default_word_count_goal(),
            autosave_interval: default_autosave_interval(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme name ("dark", "light" or "high_contrast").
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".into()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

/// Base directory for journal data and logs (`~/momentum_journal`).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("momentum_journal")
}

/// Default config file location (`~/.config/momentum_journal/config.json`).
pub fn default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home
            .join(".config")
            .join("momentum_journal")
            .join("config.json"),
        None => PathBuf::from("momentum_journal_config.json"),
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Load configuration, writing the defaults first if the file is missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, creating default config");
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let config = Self::load(path)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.journal.word_count_goal == 0 {
            return Err(ConfigError::Invalid(
                "journal.word_count_goal must be positive".into(),
            ));
        }
        if !(1..=MAX_AUTOSAVE_INTERVAL).contains(&self.journal.autosave_interval) {
            return Err(ConfigError::Invalid(format!(
                "journal.autosave_interval must be between 1 and {MAX_AUTOSAVE_INTERVAL} seconds"
            )));
        }
        Ok(())
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Config parsed but holds an unusable value.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model_name, "llama3");
        assert_eq!(config.journal.word_count_goal, 750);
        assert_eq!(config.journal.autosave_interval, 30);
        assert_eq!(config.ui.theme, "dark");
        assert!(config.journal.storage_dir.ends_with("momentum_journal/journals"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"journal":{"word_count_goal":500},"ui":{"theme":"light"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.journal.word_count_goal, 500);
        assert_eq!(config.journal.autosave_interval, 30);
        assert_eq!(config.ui.theme, "light");
        assert_eq!(config.llm.max_tokens, 2048);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let config = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.journal.word_count_goal, 750);

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.ui.theme, config.ui.theme);
    }

    #[test]
    fn test_load_rejects_zero_goal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"journal":{"word_count_goal":0}}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_rejects_out_of_range_autosave_interval() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        for interval in [0, MAX_AUTOSAVE_INTERVAL + 1, u64::MAX / 10] {
            let json = format!(r#"{{"journal":{{"autosave_interval":{interval}}}}}"#);
            std::fs::write(&path, json).unwrap();
            let err = Config::load(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "interval {interval}");
        }

        std::fs::write(&path, r#"{"journal":{"autosave_interval":86400}}"#).unwrap();
        assert_eq!(Config::load(&path).unwrap().journal.autosave_interval, 86400);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
