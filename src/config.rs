use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

use crate::typewriter::DEFAULT_REVEAL_INTERVAL;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat";
pub const DEFAULT_TITLE: &str = "TARS / COMMAND";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk configuration, every field optional
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub reveal_interval_ms: Option<u64>,
    pub title: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub reveal_interval_ms: Option<u64>,
    pub title: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings the app runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub reveal_interval: Duration,
    pub title: String,
    pub request_timeout: Option<Duration>,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Could not read {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;
        Ok(config)
    }

    /// Merge with `overrides`, which win over the file, then fall back to
    /// defaults
    pub fn resolve(self, overrides: Overrides) -> Settings {
        let reveal_ms = overrides
            .reveal_interval_ms
            .or(self.reveal_interval_ms);

        Settings {
            endpoint: overrides
                .endpoint
                .or(self.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            reveal_interval: reveal_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REVEAL_INTERVAL),
            title: overrides
                .title
                .or(self.title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            request_timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_dir: overrides
                .log_dir
                .or(self.log_dir)
                .unwrap_or_else(default_log_dir),
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("tars").join("config.json"))
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tars")
        .join("logs")
}
