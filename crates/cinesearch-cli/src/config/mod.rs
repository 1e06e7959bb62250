//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB request options and screen
//! settings. The API token is never stored here.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_log_path};
