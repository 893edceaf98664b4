//! Configuration management
//!
//! Config file is stored next to the executable as `log-console.toml`,
//! unless a path is given explicitly.

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_FEED_PORT, DEFAULT_FLASH_DEBOUNCE_MS, DEFAULT_FLASH_PULSE_MS,
};
use crate::error::{ConsoleError, Result};
use crate::tracking::HighlightSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub highlight: HighlightConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Localhost UDP port receiving host events
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Quiet period before re-flashing a highlighted indicator (milliseconds)
    pub debounce_ms: u64,
    /// Length of the attention pulse (milliseconds)
    pub pulse_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. "info" or "log_console=debug"
    pub level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_FEED_PORT,
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_FLASH_DEBOUNCE_MS,
            pulse_ms: DEFAULT_FLASH_PULSE_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HighlightConfig {
    pub fn settings(&self) -> HighlightSettings {
        HighlightSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            pulse: Duration::from_millis(self.pulse_ms),
        }
    }
}

impl Config {
    /// Reject values the console cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.feed.port == 0 {
            return Err(ConsoleError::ConfigValidation {
                field: "feed.port",
                reason: "must not be 0".into(),
            });
        }
        if self.highlight.debounce_ms == 0 {
            return Err(ConsoleError::ConfigValidation {
                field: "highlight.debounce_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.highlight.pulse_ms == 0 {
            return Err(ConsoleError::ConfigValidation {
                field: "highlight.pulse_ms",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Default config file path (next to the executable)
pub fn default_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| ConsoleError::ConfigRead {
        path: PathBuf::from("executable"),
        source: e,
    })?;
    let exe_dir = exe.parent().ok_or_else(|| ConsoleError::ConfigValidation {
        field: "exe_path",
        reason: "no parent directory".into(),
    })?;
    Ok(exe_dir.join(CONFIG_FILE_NAME))
}

/// Load and validate config from `path`
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| ConsoleError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConsoleError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    config.validate()?;
    Ok(config)
}

/// Load config from `path` (or the default location), falling back to defaults
pub fn load(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_path() {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to determine config path: {}, using defaults", e);
                return Config::default();
            }
        },
    };

    if !path.exists() {
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Save config to `path`
pub fn save(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| ConsoleError::ConfigValidation {
        field: "config",
        reason: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| ConsoleError::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
