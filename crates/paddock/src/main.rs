//! `paddock` - CLI for fetching, storing and charting race results
//!
//! This binary wires the configuration, the Ergast source, the `SQLite` store
//! and the chart reporter together.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use paddock::cli::{
    Cli, Command, ConfigCommand, FetchCommand, RankingArg, ReportCommand, RunCommand,
    ShowCommand, StatusCommand,
};
use paddock::report::{constructor_points_ranking, driver_points_ranking, podium_counts, Ranked};
use paddock::{init_logging, pipeline, Config, ErgastSource, Reporter, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config_path = cli.config.clone();
    let config = Config::load_from(config_path).context("could not load configuration")?;

    // Execute the command
    match cli.command_or_default() {
        Command::Run(cmd) => handle_run(config, &cmd).await,
        Command::Fetch(cmd) => handle_fetch(config, &cmd).await,
        Command::Report(cmd) => handle_report(config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn with_season(mut config: Config, season: Option<i32>) -> anyhow::Result<Config> {
    if let Some(season) = season {
        config.source.season = season;
        config.validate()?;
    }
    Ok(config)
}

async fn handle_run(config: Config, cmd: &RunCommand) -> anyhow::Result<()> {
    let mut config = with_season(config, cmd.season)?;
    cmd.report.apply(&mut config);
    config.validate()?;

    let season = config.source.season;
    let source = ErgastSource::from_config(&config)?;
    let storage = Storage::open(config.database_path())?;
    let reporter = Reporter::from_config(&config);

    let summary = pipeline::run(&source, season, &storage, &reporter, &cmd.report.kinds())
        .await
        .with_context(|| format!("season {season} run failed"))?;

    println!(
        "Stored {} results for {} in {}",
        summary.written,
        summary.season,
        storage.path().display()
    );
    for chart in &summary.charts {
        println!("  {}", chart.display());
    }
    Ok(())
}

async fn handle_fetch(config: Config, cmd: &FetchCommand) -> anyhow::Result<()> {
    let config = with_season(config, cmd.season)?;
    let season = config.source.season;
    let source = ErgastSource::from_config(&config)?;
    let storage = Storage::open(config.database_path())?;

    let written = pipeline::fetch_and_store(&source, season, &storage)
        .await
        .with_context(|| format!("could not fetch season {season}"))?;

    println!(
        "Stored {} results for {} in {}",
        written,
        season,
        storage.path().display()
    );
    Ok(())
}

fn handle_report(mut config: Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    cmd.report.apply(&mut config);
    config.validate()?;

    let storage = Storage::open_existing(config.database_path())?;
    let reporter = Reporter::from_config(&config);
    let (_, charts) = pipeline::load_and_report(&storage, &reporter, &cmd.report.kinds())?;

    for chart in &charts {
        println!("{}", chart.display());
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let storage = Storage::open_existing(config.database_path())?;
    let records = storage.read_results()?;

    match cmd.ranking {
        RankingArg::Drivers => print_ranking(&driver_points_ranking(&records), cmd.json),
        RankingArg::Constructors => {
            print_ranking(&constructor_points_ranking(&records), cmd.json)
        }
        RankingArg::Podiums => print_ranking(&podium_counts(&records), cmd.json),
    }
}

fn print_ranking<T>(ranking: &[Ranked<'_, T>], json: bool) -> anyhow::Result<()>
where
    T: std::fmt::Display + serde::Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(ranking)?);
    } else if ranking.is_empty() {
        println!("No results stored.");
    } else {
        for (i, entry) in ranking.iter().enumerate() {
            println!("{:>3}. {:<28} {}", i + 1, entry.name, entry.value);
        }
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let path = config.database_path();
    let stats = match Storage::open_existing(&path) {
        Ok(storage) => Some(storage.stats()?),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    if cmd.json {
        let status = serde_json::json!({
            "database_path": path,
            "database_exists": stats.is_some(),
            "total_results": stats.as_ref().map_or(0, |s| s.total_results),
            "races": stats.as_ref().map_or(0, |s| s.races),
            "seasons": stats.as_ref().map(|s| s.seasons.clone()).unwrap_or_default(),
            "db_size_bytes": stats.as_ref().map_or(0, |s| s.db_size_bytes),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("paddock status");
        println!("--------------");
        println!("Database:      {}", path.display());
        match stats {
            Some(stats) => {
                let seasons: Vec<String> = stats.seasons.iter().map(ToString::to_string).collect();
                println!("Results:       {}", stats.total_results);
                println!("Races:         {}", stats.races);
                println!("Seasons:       {}", seasons.join(", "));
                println!("Size:          {} bytes", stats.db_size_bytes);
            }
            None => println!("Results:       none (run `paddock fetch`)"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Source]");
                println!("  Base URL:           {}", config.source.base_url);
                println!("  Season:             {}", config.source.season);
                println!("  Result limit:       {}", config.source.result_limit);
                println!("  Timeout (secs):     {}", config.source.timeout_secs);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Report]");
                println!("  Output dir:         {}", config.output_dir().display());
                println!("  Driver:             {}", config.report.driver);
                println!("  Constructor:        {}", config.report.constructor);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
