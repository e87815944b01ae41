//! # tsw-connect
//!
//! A telemetry collector for the Train Sim World local HTTP API.
//!
//! ## Overview
//!
//! tsw-connect subscribes to the player's driver aid data and to the
//! position of every AI vehicle in the timetable, polls that subscription on
//! a fixed interval while a terminal dashboard shows progress, and writes
//! both datasets as point layers (GeoJSON or CSV with WKT geometry) once
//! collection stops.
//!
//! ## Usage
//!
//! ```no_run
//! use tsw_connect::collectors::{CollectionSession, RunMode};
//! use tsw_connect::config::load_or_create_config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Load configuration
//! let config = load_or_create_config(None)?;
//!
//! // Subscribe and collect until Enter or Ctrl+C
//! let session = CollectionSession::setup(config).await?;
//! let report = session.run(RunMode::Dashboard).await?;
//!
//! println!("Summary at {}", report.summary_file.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`api`]: HTTP client for the game API
//! - [`telemetry`]: Mapping of API payloads to records
//! - [`collectors`]: Poll loop and session lifecycle
//! - [`dashboard`]: Terminal status display
//! - [`export`]: GeoJSON and CSV writers
//! - [`config`]: Configuration management
//! - [`utils`]: Collection summary
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// HTTP client for the game's telemetry API
pub mod api;

/// Extraction of records from subscription snapshots
pub mod telemetry;

/// Background polling and collection sessions
pub mod collectors;

/// Terminal dashboard
pub mod dashboard;

/// Vector file export
pub mod export;

/// Utility functions for reporting
pub mod utils;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
