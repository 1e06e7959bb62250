//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinesearch_screen::SearchOptions;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search screen settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// TMDB request configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language sent with every search.
    #[serde(default = "default_language")]
    pub language: String,
    /// Include adult titles in results.
    #[serde(default)]
    pub include_adult: bool,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Search screen configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Seconds a toast stays on screen.
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

fn default_language() -> String {
    String::from("en-US")
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_notice_secs() -> u64 {
    4
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            include_adult: false,
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_secs: default_notice_secs(),
        }
    }
}

impl TmdbConfig {
    /// Search options for the controller, with an optional language override.
    #[must_use]
    pub fn search_options(&self, language: Option<&str>) -> SearchOptions {
        SearchOptions {
            language: String::from(language.unwrap_or(&self.language)),
            include_adult: self.include_adult,
        }
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    /// Toast lifetime.
    #[must_use]
    pub const fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// holds an invalid value.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Checks values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmdb.timeout_secs` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.tmdb.timeout_secs == 0 {
            bail!("tmdb.timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Renders the config as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
