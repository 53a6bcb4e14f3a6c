use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub generation_delay_ms: u64,
    pub highlight_ms: u64,
    pub log_filter: String,
    pub window_width: u32,
    pub window_height: u32,
    pub api_keys: Vec<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            generation_delay_ms: 1500,
            highlight_ms: 2000,
            log_filter: "info".to_string(),
            window_width: 1280,
            window_height: 800,
            api_keys: Vec::new(),
        }
    }
}

impl StudioConfig {
    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_path() -> PathBuf {
    home_dir().join(".studio").join("config.json")
}

pub fn read_config_file(path: &Path) -> Result<StudioConfig, ConfigError> {
    let data = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the config, falling back to defaults. A missing file is silent; any
/// other failure comes back as a warning line.
pub fn load(path: &Path) -> (StudioConfig, Option<String>) {
    if !path.exists() {
        return (StudioConfig::default(), None);
    }
    match read_config_file(path) {
        Ok(config) => (config, None),
        Err(err) => (StudioConfig::default(), Some(err.to_string())),
    }
}
