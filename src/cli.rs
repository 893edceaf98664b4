//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Per-source output logs with an unread attention indicator
#[derive(Parser, Debug, Default)]
#[command(name = "log-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (default: log-console.toml next to the executable)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// UDP port for the host event feed (overrides config)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Flash debounce window in milliseconds (overrides config)
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a config file with default values
    InitConfig {
        /// Destination (default: next to the executable)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["log-console"]);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["log-console", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["log-console", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from([
            "log-console",
            "--port",
            "9500",
            "--debounce-ms",
            "250",
            "--config",
            "/tmp/c.toml",
        ]);
        assert_eq!(cli.port, Some(9500));
        assert_eq!(cli.debounce_ms, Some(250));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_cli_parse_init_config() {
        let cli = Cli::parse_from(["log-console", "init-config", "out.toml"]);
        match cli.command {
            Some(Command::InitConfig { path }) => {
                assert_eq!(path, Some(PathBuf::from("out.toml")));
            }
            _ => panic!("Expected InitConfig command"),
        }
    }
}
