//! Telemetry collection.
//!
//! A collection runs as two cooperating parts sharing one [`RecordStore`]:
//!
//! ```text
//! ┌──────────────────┐  push_tick   ┌─────────────┐  counts   ┌───────────┐
//! │ Poller (spawned) │ ───────────▶ │ RecordStore │ ◀──────── │ Dashboard │
//! └──────────────────┘              └─────────────┘           └───────────┘
//!          ▲                               │ take
//!          │ CancellationToken             ▼
//! ┌──────────────────────────────────────────────┐
//! │ CollectionSession: stop, join, export, summary │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tsw_connect::collectors::{CollectionSession, RunMode};
//! use tsw_connect::config::AppConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = CollectionSession::setup(AppConfig::default()).await?;
//! let report = session.run(RunMode::Timed(Duration::from_secs(60))).await?;
//! println!("{} player records", report.summary.player_records);
//! # Ok(())
//! # }
//! ```

/// Background poll loop and its counters
pub mod poller;

/// Session lifecycle: setup, run, save
pub mod session;

/// Shared record accumulation
pub mod store;

pub use poller::{PollStats, PollStatsSnapshot, Poller};
pub use session::{CollectionSession, RunMode, SessionReport};
pub use store::RecordStore;
