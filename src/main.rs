use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use tsw_connect::api::{read_comm_key, TswApiClient};
use tsw_connect::cli::{Args, Commands};
use tsw_connect::collectors::{CollectionSession, RunMode};
use tsw_connect::config::{load_or_create_config, AppConfig};
use tsw_connect::models::GeoRecord;
use tsw_connect::telemetry::{ai_records, player_record};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    if let Some(Commands::InitConfig { path }) = &args.command {
        info!("Creating default configuration file at {}", path.display());
        AppConfig::create_default_config_file(path)?;
        info!("Configuration created successfully");
        return Ok(());
    }

    // Load and process configuration
    let config = load_and_process_config(&args)?;

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(async {
        match &args.command {
            Some(Commands::ListVehicles) => list_vehicles(&config).await,
            Some(Commands::Snapshot) => snapshot(&config).await,
            Some(Commands::InitConfig { .. }) => Ok(()),
            None => collect(config, &args).await,
        }
    })
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Load configuration, apply command-line overrides and validate
fn load_and_process_config(args: &Args) -> Result<AppConfig> {
    let mut config = load_or_create_config(args.config.as_deref())?;
    config.process_environment_variables()?;

    if let Some(interval_ms) = args.interval_ms {
        config.collection.interval_ms = interval_ms;
    }
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn connect(config: &AppConfig) -> Result<TswApiClient> {
    let comm_key = read_comm_key(config.api.comm_key_path.as_deref())?;
    Ok(TswApiClient::new(&config.api, comm_key)?)
}

async fn list_vehicles(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    let vehicles = client.list_timetable().await.context("Failed to list timetable vehicles")?;

    info!("{} AI vehicles in the timetable", vehicles.len());
    for vehicle in &vehicles {
        println!("{}", vehicle);
    }
    Ok(())
}

async fn snapshot(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    let vehicles = client.list_timetable().await.context("Failed to list timetable vehicles")?;
    client.setup_subscription(&vehicles).await.context("Failed to set up subscription")?;

    let snapshot = client.get_subscription().await.context("Failed to read subscription")?;
    let collected_at = Local::now();

    match player_record(&snapshot, collected_at) {
        Ok(record) => info!("Player: {:?} at {:?}", record.attributes(), record.location()),
        Err(e) => warn!("No player record: {}", e),
    }
    let ai = ai_records(collected_at, &vehicles, &snapshot);
    info!("{} of {} AI vehicles reported a position", ai.len(), vehicles.len());
    for record in &ai {
        info!("AI: {} {} at {:?}", record.vehicle_id, record.object_class, record.location);
    }
    Ok(())
}

async fn collect(config: AppConfig, args: &Args) -> Result<()> {
    info!("Starting telemetry collection");

    let session = CollectionSession::setup(config).await?;
    let mode = match args.duration {
        Some(secs) => RunMode::Timed(Duration::from_secs(secs)),
        None => RunMode::Dashboard,
    };

    let report = session.run(mode).await?;
    info!(
        "Saved {} player records to {} and {} AI records to {}",
        report.summary.player_records,
        report.summary.player_file.display(),
        report.summary.ai_records,
        report.summary.ai_file.display()
    );
    Ok(())
}
