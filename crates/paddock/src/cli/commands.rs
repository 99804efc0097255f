//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;
use crate::report::ReportKind;

/// Chart selection and trend subjects shared by `run` and `report`.
#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Driver for the driver trend chart
    #[arg(long, value_name = "NAME")]
    pub driver: Option<String>,

    /// Constructor for the constructor trend chart
    #[arg(long, value_name = "NAME")]
    pub constructor: Option<String>,

    /// Directory to write charts into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only render these charts (repeatable)
    #[arg(long, value_enum, value_name = "CHART")]
    pub only: Vec<ReportKindArg>,
}

impl ReportArgs {
    /// Override the `[report]` section with any flags given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(driver) = &self.driver {
            config.report.driver.clone_from(driver);
        }
        if let Some(constructor) = &self.constructor {
            config.report.constructor.clone_from(constructor);
        }
        if let Some(output) = &self.output {
            config.report.output_dir = Some(output.clone());
        }
    }

    /// Charts to render; all six when none were selected.
    #[must_use]
    pub fn kinds(&self) -> Vec<ReportKind> {
        if self.only.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            let mut kinds: Vec<ReportKind> = Vec::with_capacity(self.only.len());
            for kind in self.only.iter().copied().map(ReportKind::from) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            kinds
        }
    }
}

/// Run command arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct RunCommand {
    /// Season to fetch (defaults to the configured season)
    #[arg(short, long)]
    pub season: Option<i32>,

    /// Report options
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Fetch command arguments.
#[derive(Debug, Clone, Args)]
pub struct FetchCommand {
    /// Season to fetch (defaults to the configured season)
    #[arg(short, long)]
    pub season: Option<i32>,
}

/// Report command arguments.
#[derive(Debug, Clone, Args)]
pub struct ReportCommand {
    /// Report options
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Show command arguments.
#[derive(Debug, Clone, Args)]
pub struct ShowCommand {
    /// Which ranking to print
    #[arg(value_enum, default_value = "drivers")]
    pub ranking: RankingArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Clone, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Clone, Subcommand)]
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

/// Chart argument for `--only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKindArg {
    /// Top drivers by points
    DriverPoints,
    /// Top constructors by points
    ConstructorPoints,
    /// Top drivers by podiums
    PodiumCounts,
    /// Points distribution of the top drivers
    PointsDistribution,
    /// Driver points per round
    DriverTrend,
    /// Constructor points per round
    ConstructorTrend,
}

impl From<ReportKindArg> for ReportKind {
    fn from(arg: ReportKindArg) -> Self {
        match arg {
            ReportKindArg::DriverPoints => Self::DriverPoints,
            ReportKindArg::ConstructorPoints => Self::ConstructorPoints,
            ReportKindArg::PodiumCounts => Self::PodiumCounts,
            ReportKindArg::PointsDistribution => Self::PointsDistribution,
            ReportKindArg::DriverTrend => Self::DriverTrend,
            ReportKindArg::ConstructorTrend => Self::ConstructorTrend,
        }
    }
}

/// Ranking printed by `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RankingArg {
    /// Drivers by total points
    #[default]
    Drivers,
    /// Constructors by total points
    Constructors,
    /// Drivers by podium finishes
    Podiums,
}
