//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::render::OutputFormat;

/// Session command arguments.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Read commands from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Echo each command before its output
    #[arg(short, long)]
    pub echo: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_args_debug() {
        let args = SessionArgs {
            script: Some(PathBuf::from("visits.txt")),
            format: Some(OutputFormat::Table),
            echo: false,
        };
        let debug_str = format!("{args:?}");
        assert!(debug_str.contains("visits.txt"));
        assert!(debug_str.contains("Table"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
