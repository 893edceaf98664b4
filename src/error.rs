//! Centralized error types for the console
//!
//! The log core never fails; only the ambient layer (config, feed socket,
//! runtime) produces a `ConsoleError`.
//! Use `Result<T>` as shorthand for `std::result::Result<T, ConsoleError>`.

use std::fmt;
use std::path::PathBuf;

/// All console errors
#[derive(Debug)]
pub enum ConsoleError {
    // === Network ===
    /// Failed to bind the host event feed socket
    FeedBind { port: u16, source: std::io::Error },

    // === Config ===
    /// Config file could not be read
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file could not be written
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse { path: PathBuf, reason: String },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FeedBind { source, .. }
            | Self::ConfigRead { source, .. }
            | Self::ConfigWrite { source, .. }
            | Self::Runtime { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedBind { port, .. } => write!(f, "Cannot bind feed port {}", port),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigWrite { path, .. } => {
                write!(f, "Cannot write config: {}", path.display())
            }
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

/// Alias for Result with ConsoleError
pub type Result<T> = std::result::Result<T, ConsoleError>;
