//! Command-line interface for zonewatch.
//!
//! This module provides the CLI structure for the `zwatch` binary: the
//! in-scope transport over the aggregation layer. The commands map
//! one-to-one onto the summary operations plus the maintenance paths.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ImportCommand, ImportFormat, PersonCommand, PersonsCommand, PruneCommand,
    StatusCommand, ZonesCommand,
};

/// zwatch - Zone occupancy summaries for the workplace dashboard
///
/// Stores the occupancy records written by the tracking process and
/// computes per-person and aggregate zone-time summaries over them.
#[derive(Debug, Parser)]
#[command(name = "zwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize every tracked person with their full history
    Persons(PersonsCommand),

    /// Summarize every tracked person as a bare person → totals mapping
    Zones(ZonesCommand),

    /// Summarize a single person's zone times and history
    Person(PersonCommand),

    /// Import records produced by the tracking process
    Import(ImportCommand),

    /// Show storage statistics
    Status(StatusCommand),

    /// Delete records older than the retention age
    Prune(PruneCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
