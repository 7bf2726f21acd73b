//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Optional path to a detector profile (JSON). When unset, the
    /// built-in default profile is used.
    pub profile_path: Option<PathBuf>,

    /// Defaults for the driving loop.
    pub runtime: RuntimeDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters of the loop that ticks the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeDefaults {
    /// Tick rate used when pacing frames in real time (Hz).
    pub tick_rate_hz: u32,

    /// Maximum rate of lock-status log lines (Hz).
    pub status_log_rate_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "salient=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for RuntimeDefaults {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            status_log_rate_hz: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("salient").join("config.json")
}
