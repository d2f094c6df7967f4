//! Configuration for search sessions and the verse provider
//!
//! Read from `{config_dir}/verse-search/config.json`. A missing file means
//! defaults; the CLI layers flags and environment variables on top.

use crate::error::ConfigError;
use crate::search::engine::DEFAULT_CATALOG_MATCH_THRESHOLD;
use crate::search::parser::DEFAULT_BOOK_MATCH_THRESHOLD;
use crate::search::ranking::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_TRANSLATION_ID: &str = "KJV";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search runs
    pub debounce_ms: u64,
    /// Similarity a book name must exceed to resolve a reference fragment
    pub book_match_threshold: f64,
    /// Similarity a book name must exceed to appear as a book result
    pub catalog_match_threshold: f64,
    /// Translation passed to the verse provider
    pub translation_id: String,
    pub weights: ScoringWeights,
    pub provider: Option<ProviderConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            book_match_threshold: DEFAULT_BOOK_MATCH_THRESHOLD,
            catalog_match_threshold: DEFAULT_CATALOG_MATCH_THRESHOLD,
            translation_id: DEFAULT_TRANSLATION_ID.to_string(),
            weights: ScoringWeights::default(),
            provider: None,
        }
    }
}

/// Connection settings for the remote verse database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_id: String,
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("book_match_threshold", self.book_match_threshold),
            ("catalog_match_threshold", self.catalog_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.translation_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "translation_id cannot be empty".to_string(),
            ));
        }
        if let Some(provider) = &self.provider {
            url::Url::parse(&provider.base_url).map_err(|e| {
                ConfigError::Invalid(format!("provider.base_url {:?}: {}", provider.base_url, e))
            })?;
        }
        Ok(())
    }

    /// Copy with the provider password masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(provider) = copy.provider.as_mut() {
            provider.password = "********".to_string();
        }
        copy
    }
}

/// Get the path to the configuration file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("verse-search").join("config.json"))
}

/// Load the configuration from the default location
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    load_config_from(&config_path()?)
}

/// Load the configuration from `path`, returning defaults when it does not exist
pub fn load_config_from(path: &Path) -> Result<SearchConfig, ConfigError> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(SearchConfig::default());
    }

    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let config: SearchConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
