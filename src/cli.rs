use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for tsw-connect.
///
/// Without a subcommand the tool sets up the subscription and collects until
/// stopped, or for `--duration` seconds when given.
#[derive(Parser, Debug)]
#[clap(name = "tsw-connect", about = "Train Sim World telemetry collector", version)]
pub struct Args {
    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Poll interval in milliseconds (overrides the config file)
    #[clap(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// Collect for this many seconds without the dashboard
    #[clap(short, long)]
    pub duration: Option<u64>,

    /// Base URL of the game API (overrides the config file)
    #[clap(long)]
    pub base_url: Option<String>,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "config.yml")]
        path: PathBuf,
    },

    /// Print the AI vehicles in the current timetable
    ListVehicles,

    /// Poll the subscription once and log the extracted records
    Snapshot,
}
