//! Configuration management for frontdesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::render::OutputFormat;
use crate::time::{self, TimestampFormat, Timezone, DEFAULT_TIMESTAMP_FORMAT};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "frontdesk";

/// Session history file name, under the data directory.
const HISTORY_FILE_NAME: &str = "history";

/// Environment variable prefix.
const ENV_PREFIX: &str = "FRONTDESK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FRONTDESK_`, sections split on `__`,
///    e.g. `FRONTDESK_DISPLAY__TIMEZONE=utc`)
/// 2. TOML config file at `~/.config/frontdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How timestamps and reports are rendered.
    pub display: DisplayConfig,
    /// Interactive session behavior.
    pub session: SessionConfig,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for check-in and check-out times.
    pub timestamp_format: String,
    /// Timezone timestamps are rendered in.
    pub timezone: Timezone,
    /// Default output format for reports.
    pub format: OutputFormat,
}

/// Session-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prompt printed before each line when reading from a terminal.
    pub prompt: String,
    /// Echo each command before its output (useful for scripts).
    pub echo: bool,
    /// Keep terminal input history between sessions.
    pub history: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            timezone: Timezone::Local,
            format: OutputFormat::Plain,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "frontdesk> ".to_string(),
            echo: false,
            history: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", config_file.display());

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the terminal history file path, if history is enabled.
    #[must_use]
    pub fn history_path(&self) -> Option<PathBuf> {
        self.session.history.then(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from(".local/share"))
                .join(CONFIG_DIR_NAME)
                .join(HISTORY_FILE_NAME)
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        time::validate_pattern(&self.display.timestamp_format)?;

        if self.session.prompt.contains('\n') {
            return Err(Error::ConfigValidation {
                message: "session prompt cannot contain a newline".to_string(),
            });
        }

        Ok(())
    }

    /// Build the timestamp format described by the display section.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid.
    pub fn timestamp_format(&self) -> Result<TimestampFormat> {
        TimestampFormat::new(
            self.display.timestamp_format.clone(),
            self.display.timezone,
        )
    }
}
