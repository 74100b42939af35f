//! User configuration loaded from TOML.
//!
//! The file lives at `$XDG_CONFIG_HOME/timeblock/config.toml`
//! (`~/.config/timeblock/config.toml`). Every key is optional; a missing
//! file means Monday to Friday, 09:00 to 17:00.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ScheduleError},
    models::PeakHours,
    scheduler::Scheduler,
};

const APP_PREFIX: &str = "timeblock";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "timeblock.db";

/// Settings for the OpenAI-compatible planning backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL, `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Re-prompts allowed after a proposal fails validation
    pub max_retries: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workdays: Vec<String>,
    pub day_start: String,
    pub day_end: String,
    pub peak_hours: Option<PeakHours>,
    pub database_file: Option<PathBuf>,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workdays: ["monday", "tuesday", "wednesday", "thursday", "friday"]
                .map(String::from)
                .to_vec(),
            day_start: "09:00".to_string(),
            day_end: "17:00".to_string(),
            peak_hours: None,
            database_file: None,
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the XDG location when
    /// `path` is `None`.
    ///
    /// An explicit path must exist. A missing file at the XDG location
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::find_default_file() {
                Some(path) => path,
                None => {
                    debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(&path).map_err(|e| ScheduleError::FileSystem {
            path: path.clone(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ScheduleError::Configuration {
            message: format!("Invalid configuration file: {e}"),
        })
    }

    fn find_default_file() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix(APP_PREFIX).find_config_file(CONFIG_FILE)
    }

    /// Builds the scheduler described by the workday settings.
    pub fn scheduler(&self) -> Result<Scheduler> {
        Scheduler::new(
            &self.workdays,
            &self.day_start,
            &self.day_end,
            self.peak_hours.clone(),
        )
    }

    /// Configured database file, falling back to the XDG data directory:
    /// `$XDG_DATA_HOME/timeblock/timeblock.db`.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_file {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}

/// Default database location under the XDG data directory.
pub fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix(APP_PREFIX)
        .place_data_file(DATABASE_FILE)
        .map_err(|e| ScheduleError::XdgDirectory(e.to_string()))
}
