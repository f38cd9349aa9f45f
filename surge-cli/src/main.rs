use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use schemars::schema_for;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use surge_core::{EndpointWeightTable, LoadCoordinator, RunConfig};

mod output;
mod profile;
mod scenario;

use output::RunReport;
use profile::LoadProfile;

/// Surge: weighted load generator for the observability demo service
///
/// Surge drives a target HTTP service with a weighted endpoint mix at a
/// fixed aggregate rate, spread across concurrent workers, and prints a
/// summary of the outcomes.
///
/// Example usage:
///   surge run
///   surge run stress --base-url http://10.0.0.1:3010
///   surge run -P profiles/demo.toml --duration 2m
///   surge scenarios
#[derive(Parser)]
#[command(name = "surge")]
#[command(version, about = "Weighted HTTP load generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a load test (default scenario: normal)
    Run(RunArgs),

    /// List scenario presets
    Scenarios,

    /// Generate JSON Schema for profile files
    Schema,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Scenario preset: baseline, normal, high, stress
    scenario: Option<String>,

    /// Path to a TOML profile file
    #[arg(short = 'P', long)]
    profile: Option<PathBuf>,

    /// Base URL of the target service
    #[arg(long)]
    base_url: Option<String>,

    /// Run duration (e.g. "30s", "2m")
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,

    /// Target aggregate request rate, overriding the scenario
    #[arg(long)]
    rps: Option<f64>,

    /// Worker count, overriding the scenario
    #[arg(long)]
    workers: Option<usize>,

    /// Fixed per-worker delay between requests, overriding derived pacing
    #[arg(long, value_parser = humantime::parse_duration)]
    worker_delay: Option<Duration>,

    /// Per-request timeout
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Master seed for reproducible endpoint selection
    #[arg(long)]
    seed: Option<u64>,

    /// Write the summary as JSON to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Scenarios => {
            for preset in scenario::SCENARIOS {
                println!(
                    "{:<10} {:>5} req/s, {:>2} workers",
                    preset.name, preset.requests_per_second, preset.worker_count
                );
            }
            Ok(())
        }
        Commands::Schema => {
            let schema = schema_for!(LoadProfile);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "surge".to_string(), &mut io::stdout());
            Ok(())
        }
        Commands::Run(args) => run_load(args),
    }
}

fn run_load(args: RunArgs) -> anyhow::Result<()> {
    let profile = match &args.profile {
        Some(path) => {
            tracing::info!("Loading profile: {}", path.display());
            LoadProfile::from_file(path)?
        }
        None => LoadProfile::default(),
    };

    // Resolution order: CLI flag, then profile, then scenario preset
    let scenario_name =
        args.scenario.unwrap_or_else(|| profile.load.scenario.clone());
    let preset = scenario::resolve(&scenario_name);

    let requests_per_second = args
        .rps
        .or(profile.load.requests_per_second)
        .unwrap_or(preset.requests_per_second);
    let worker_count = args.workers.or(profile.load.workers).unwrap_or(preset.worker_count);
    let base_url = args
        .base_url
        .unwrap_or_else(|| profile.target.base_url.clone())
        .trim_end_matches('/')
        .to_string();

    let config = RunConfig {
        base_url: base_url.clone(),
        duration: Some(args.duration.unwrap_or(profile.load.duration)),
        requests_per_second,
        worker_count,
        worker_delay: args.worker_delay.or(profile.load.worker_delay),
        request_timeout: args.timeout.unwrap_or(profile.load.request_timeout),
        seed: args.seed.or(profile.load.seed),
    };

    let table = if profile.endpoints.is_empty() {
        EndpointWeightTable::demo_mix()
    } else {
        EndpointWeightTable::new(profile.endpoints.clone())?
    };

    tracing::info!("=== Run Configuration ===");
    tracing::info!("Scenario: {}", preset.name);
    tracing::info!("Target: {}", base_url);
    tracing::info!("Duration: {:?}", config.duration);
    tracing::info!(
        "Load: {} req/s across {} workers (pacing {:?})",
        config.requests_per_second,
        config.worker_count,
        config.pacing_interval()
    );
    if let Some(seed) = config.seed {
        tracing::info!("Seed: {} (reproducible mode)", seed);
    }
    tracing::info!("Endpoints: {}", table.len());
    for entry in table.entries() {
        tracing::info!("  {} (weight {})", entry.path, entry.weight);
    }
    tracing::info!("=========================");

    // Startup preconditions are the only failures that reach the process
    // boundary; per-request failures end up in the report.
    let coordinator = LoadCoordinator::new(config, table);
    let summary = coordinator.run()?;

    let report = RunReport::from_summary(preset.name, &base_url, &summary);
    report.print_human();

    if let Some(path) = args.output.as_deref().or(profile.output.file.as_deref()) {
        report.write_json(path)?;
        tracing::info!("Results written to: {}", path.display());
    }

    Ok(())
}
