use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::json;
use uuid::Uuid;

use crate::collectors::PollStatsSnapshot;

/// What a finished collection session produced.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub interval_ms: u64,
    pub vehicle_count: usize,
    pub player_records: usize,
    pub ai_records: usize,
    pub stats: PollStatsSnapshot,
    pub player_file: PathBuf,
    pub ai_file: PathBuf,
    /// False when the poller had to be aborted after the join timeout
    pub poller_joined: bool,
}

/// Create a JSON summary of the collection.
///
/// # Example Output
///
/// ```json
/// {
///   "session_id": "550e8400-e29b-41d4-a716-446655440000",
///   "hostname": "sim-rig",
///   "started_at": "2024-01-15T14:30:52+00:00",
///   "duration_seconds": 312.5,
///   "records": {"player": 625, "ai": 9375},
///   "files": {"player": "data/player.geojson", "ai": "data/ai.geojson"},
///   ...
/// }
/// ```
pub fn create_collection_summary(hostname: &str, summary: &SessionSummary) -> Result<String> {
    let duration = summary.finished_at.signed_duration_since(summary.started_at);
    let duration_seconds = duration.num_milliseconds().max(0) as f64 / 1000.0;

    let report = json!({
        "session_id": Uuid::new_v4().to_string(),
        "hostname": hostname,
        "started_at": summary.started_at.to_rfc3339(),
        "finished_at": summary.finished_at.to_rfc3339(),
        "duration_seconds": duration_seconds,
        "interval_ms": summary.interval_ms,
        "vehicle_count": summary.vehicle_count,
        "records": {
            "player": summary.player_records,
            "ai": summary.ai_records,
        },
        "poll_stats": summary.stats,
        "poller_joined": summary.poller_joined,
        "files": {
            "player": summary.player_file.display().to_string(),
            "ai": summary.ai_file.display().to_string(),
        },
        "os": std::env::consts::OS,
        "collector_version": env!("CARGO_PKG_VERSION"),
    });

    serde_json::to_string_pretty(&report).context("Failed to serialize collection summary to JSON")
}

/// Write the summary JSON to `path`, creating the parent directory.
pub fn write_collection_summary(path: &Path, hostname: &str, summary: &SessionSummary) -> Result<()> {
    let json = create_collection_summary(hostname, summary)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .context(format!("Failed to write collection summary to {}", path.display()))?;
    Ok(())
}
