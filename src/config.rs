use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

const DEFAULT_TABLE: &str = "orders";
const DEFAULT_TIMEOUT_SECS: &str = "30";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set when BOARD_URL is set")]
    Missing(&'static str),
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout: Duration,
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the board against the in-process backend.
    pub backend: Option<BackendConfig>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(url) = var("BOARD_URL") else {
            info!("BOARD_URL not set, using the in-memory backend");
            return Ok(Self { backend: None });
        };
        let anon_key = var("BOARD_ANON_KEY").ok_or(ConfigError::Missing("BOARD_ANON_KEY"))?;

        let table = var("BOARD_TABLE").unwrap_or_else(|| {
            info!("BOARD_TABLE not set, using default: {DEFAULT_TABLE}");
            DEFAULT_TABLE.to_string()
        });

        let timeout_raw = var("BOARD_TIMEOUT_SECS").unwrap_or_else(|| {
            info!("BOARD_TIMEOUT_SECS not set, using default: {DEFAULT_TIMEOUT_SECS}");
            DEFAULT_TIMEOUT_SECS.to_string()
        });
        let timeout_secs: u64 = timeout_raw.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Invalid {
                key: "BOARD_TIMEOUT_SECS",
                value: timeout_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            backend: Some(BackendConfig {
                url,
                anon_key,
                table,
                timeout: Duration::from_secs(timeout_secs),
                session_file: var("BOARD_SESSION_FILE").map(PathBuf::from),
            }),
        })
    }
}
