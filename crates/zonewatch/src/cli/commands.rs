//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Persons command arguments.
#[derive(Debug, Args)]
pub struct PersonsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Person command arguments.
#[derive(Debug, Args)]
pub struct PersonCommand {
    /// The person id to summarize
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Zones command arguments.
#[derive(Debug, Args)]
pub struct ZonesCommand {
    /// Pretty-print the JSON mapping
    #[arg(short, long)]
    pub pretty: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// File of records produced by the tracking process
    pub file: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ImportFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Prune command arguments.
#[derive(Debug, Args)]
pub struct PruneCommand {
    /// Delete records older than this many days (overrides configuration)
    #[arg(long, value_name = "DAYS")]
    pub max_age_days: Option<u32>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
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

/// Input format for record imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImportFormat {
    /// A single JSON array of records
    #[default]
    Json,
    /// One JSON record per line
    Jsonl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_format_default() {
        assert_eq!(ImportFormat::default(), ImportFormat::Json);
    }

    #[test]
    fn test_persons_command_debug() {
        let cmd = PersonsCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_person_command_debug() {
        let cmd = PersonCommand {
            id: "A1B2".to_string(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("A1B2"));
    }

    #[test]
    fn test_import_command_debug() {
        let cmd = ImportCommand {
            file: PathBuf::from("records.json"),
            format: ImportFormat::Jsonl,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("records.json"));
        assert!(debug_str.contains("Jsonl"));
    }

    #[test]
    fn test_prune_command_debug() {
        let cmd = PruneCommand {
            max_age_days: Some(30),
            yes: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("max_age_days"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
