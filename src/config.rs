//! Settings
//!
//! Read from YAML. Every field has a default, so an empty or partial file is
//! valid.

use crate::association::PercentageBasis;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date pattern: {0}")]
    DatePattern(#[from] regex::Error),
}

/// Which extraction strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Heuristic,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Heading whose section holds the day's log
    pub heading: String,
    pub strategy: Strategy,
    pub llm: LlmSettings,
    /// Where the extraction cache lives; defaults under the user data dir
    pub cache_dir: Option<PathBuf>,
    /// Regex a file stem must match to count as a daily note
    pub date_pattern: String,
    pub percentage_basis: PercentageBasis,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heading: "Health Log".to_string(),
            strategy: Strategy::default(),
            llm: LlmSettings::default(),
            cache_dir: None,
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            percentage_basis: PercentageBasis::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location if it exists.
    ///
    /// An explicit path must be readable; a missing default file means
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = if text.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(text)?
        };
        settings.date_regex()?;
        Ok(settings)
    }

    pub fn date_regex(&self) -> Result<Regex, ConfigError> {
        Ok(Regex::new(&self.date_pattern)?)
    }

    /// The configured cache directory, or `<data dir>/healthlog`.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("healthlog")))
    }
}

/// `<config dir>/healthlog/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("healthlog").join("config.yaml"))
}
