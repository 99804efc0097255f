//! Command-line interface for paddock.
//!
//! This module provides the CLI structure for the `paddock` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FetchCommand, RankingArg, ReportArgs, ReportCommand, ReportKindArg,
    RunCommand, ShowCommand, StatusCommand,
};

/// paddock - Fetch, store and chart a season of race results
///
/// With no command, fetches the configured season, stores it in `SQLite`,
/// reads it back and writes all six charts.
#[derive(Debug, Parser)]
#[command(name = "paddock")]
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
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, store, reload and chart a season
    Run(RunCommand),

    /// Fetch a season and replace the stored results
    Fetch(FetchCommand),

    /// Render charts from the stored results
    Report(ReportCommand),

    /// Print a ranking from the stored results
    Show(ShowCommand),

    /// Show what is stored
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// The command to run, defaulting to a full `run`.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Run(RunCommand::default()))
    }
}
