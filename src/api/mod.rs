//! Client for the game's local HTTP telemetry API.
//!
//! The API listens on `127.0.0.1:31270` and authenticates every request with
//! the `DTGCommKey` header. Collection works through a subscription: the
//! player paths and every timetable vehicle's `ObjectClass` and `LatLon` are
//! registered once, then read in bulk on every poll.
//!
//! ```no_run
//! use tsw_connect::api::{read_comm_key, TswApiClient};
//! use tsw_connect::config::ApiConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ApiConfig::default();
//! let client = TswApiClient::new(&config, read_comm_key(None)?)?;
//!
//! let vehicles = client.list_timetable().await?;
//! client.setup_subscription(&vehicles).await?;
//! let snapshot = client.get_subscription().await?;
//! println!("{} entries", snapshot.entries.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

pub mod client;
pub mod comm_key;
pub mod error;
pub mod models;

pub use client::TswApiClient;
pub use comm_key::{candidate_paths, read_comm_key, read_comm_key_from};
pub use error::ApiError;
pub use models::{SubscriptionEntry, SubscriptionSnapshot};

/// Source of subscription snapshots for the poller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<SubscriptionSnapshot, ApiError>;
}
