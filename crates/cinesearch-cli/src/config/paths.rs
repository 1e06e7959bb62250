//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the interactive-mode log, next to `config.toml`.
const LOG_FILE_NAME: &str = "cinesearch.log";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/cinesearch/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("cinesearch")
        .join("config.toml"))
}

/// Returns the log file path that sits next to `config_path`.
#[must_use]
pub fn resolve_log_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(LOG_FILE_NAME), |d| d.join(LOG_FILE_NAME))
}
