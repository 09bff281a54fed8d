use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{EtlError, Result};

/// Run configuration, loaded from a TOML file. Every field has a default so
/// a missing config file yields the stock archived-page run.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub rates: RatesConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Which tbody on the page holds the ranking. The archived page puts the
    /// by-market-cap table first; this is positional, not structural, so a
    /// different source page needs a different index.
    pub table_index: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_SOURCE_URL.to_string(),
            table_index: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    pub path: PathBuf,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_RATES_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(constants::DEFAULT_CSV_PATH),
            db_path: PathBuf::from(constants::DEFAULT_DB_PATH),
            table_name: constants::DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_RUN_LOG_PATH),
        }
    }
}

impl Config {
    /// Load configuration. An explicitly given path must exist; the default
    /// `config.toml` is optional and falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    EtlError::Config(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    let content = fs::read_to_string(default_path).map_err(|e| {
                        EtlError::Config(format!("Failed to read config file 'config.toml': {e}"))
                    })?;
                    Ok(toml::from_str(&content)?)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}
