//! Runboard CLI - pipeline run table

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use runboard::config::RunboardConfig;
use runboard::error::{FixSuggestion, RunboardError};
use runboard::runs::{
    ensure_unique_run_ids, FileRunSource, FilterToken, MockRunSource, QueryVariablesContext,
    RunSource, RunStatus, RunsFilter, RunsQueryVariables,
};
use runboard::tui::{self, widgets::ClockTiming};

#[derive(Parser)]
#[command(name = "runboard")]
#[command(about = "Runboard - terminal run table for pipeline executions")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/runboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse runs interactively
    Show {
        /// Run file (.json, .yaml); falls back to config, then demo runs
        file: Option<PathBuf>,

        /// Initial filter token, e.g. tag:owner=data or status:FAILURE
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Print the run table once as plain text
    List {
        /// Run file (.json, .yaml)
        file: PathBuf,

        /// Filter token, e.g. tag:owner=data or status:FAILURE
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Table width in columns
        #[arg(short, long, default_value_t = 120)]
        width: u16,

        /// Show times in UTC
        #[arg(long)]
        utc: bool,
    },

    /// Check a run file (parse + unique run ids)
    Validate {
        /// Run file (.json, .yaml)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => {
            init_tracing(&cli.command, &config);
            dispatch(cli.command, config).await
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<RunboardError>()
            .and_then(|e| e.fix_suggestion())
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<RunboardConfig, RunboardError> {
    let config = match path {
        Some(path) => RunboardConfig::load_from(path)?,
        None => RunboardConfig::load()?,
    };
    config.with_env()
}

/// Log to stderr, except in the TUI where stderr would tear the screen
fn init_tracing(command: &Commands, config: &RunboardConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !matches!(command, Commands::Show { .. }) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let Some(path) = config.logging.file.as_ref() else {
        return;
    };
    match File::options().create(true).append(true).open(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(e) => eprintln!(
            "{} cannot open log file {}: {}",
            "Warning:".yellow(),
            path.display(),
            e
        ),
    }
}

async fn dispatch(command: Commands, config: RunboardConfig) -> anyhow::Result<()> {
    match command {
        Commands::Show { file, filters } => show(file, &filters, &config).await,
        Commands::List {
            file,
            filters,
            width,
            utc,
        } => list(&file, &filters, width, utc || config.display.utc, &config).await,
        Commands::Validate { file } => Ok(validate(&file).await?),
    }
}

/// Parse `--filter` arguments, rejecting tokens the runs query cannot use
fn parse_filters(raw: &[String]) -> Result<(Vec<FilterToken>, RunsFilter), RunboardError> {
    let tokens = raw
        .iter()
        .map(|token| token.parse())
        .collect::<Result<Vec<FilterToken>, _>>()?;
    let filter = RunsFilter::try_from_tokens(&tokens)?;
    Ok((tokens, filter))
}

async fn show(
    file: Option<PathBuf>,
    filters: &[String],
    config: &RunboardConfig,
) -> anyhow::Result<()> {
    let (tokens, _) = parse_filters(filters)?;
    let source: Box<dyn RunSource> = match file.or_else(|| config.runs.default_file.clone()) {
        Some(path) => Box::new(FileRunSource::new(path)),
        None => Box::new(MockRunSource::demo()),
    };

    tui::run(source, tokens, config.limit(), config.display.utc).await
}

async fn list(
    file: &Path,
    filters: &[String],
    width: u16,
    utc: bool,
    config: &RunboardConfig,
) -> anyhow::Result<()> {
    let (_, filter) = parse_filters(filters)?;
    let variables = QueryVariablesContext::new(RunsQueryVariables {
        filter,
        limit: config.limit(),
        ..Default::default()
    });

    let source = FileRunSource::new(file);
    let runs = source.fetch(&variables.current()).await?;

    let timing = ClockTiming::now(utc);
    print!("{}", tui::render_plain(&runs, width, &timing, &variables));
    Ok(())
}

async fn validate(file: &Path) -> Result<(), RunboardError> {
    let source = FileRunSource::new(file);
    let runs = source.load_all().await?;
    ensure_unique_run_ids(&runs)?;

    let pipelines: BTreeSet<&str> = runs.iter().map(|r| r.pipeline_name.as_str()).collect();

    println!("{} Run file '{}' is valid", "✓".green(), file.display());
    println!("  Runs: {}", runs.len());
    println!("  Pipelines: {}", pipelines.len());
    for status in RunStatus::ALL {
        let count = runs.iter().filter(|r| r.status == status).count();
        if count > 0 {
            println!("  {}: {}", status, count);
        }
    }

    Ok(())
}
