use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use log::{info, warn};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::api::{read_comm_key, TelemetrySource, TswApiClient};
use crate::collectors::poller::Poller;
use crate::collectors::store::RecordStore;
use crate::config::AppConfig;
use crate::constants::SUMMARY_FILE_NAME;
use crate::dashboard::Dashboard;
use crate::export::write_records;
use crate::utils::summary::{write_collection_summary, SessionSummary};

/// How a session decides when to stop polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Until Enter or Ctrl+C on the terminal dashboard
    Dashboard,
    /// For a fixed time, or until Ctrl+C
    Timed(Duration),
}

/// Result of a finished [`CollectionSession::run`].
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub summary_file: PathBuf,
}

/// One configured collection: a telemetry source with its subscription in
/// place, the vehicles it covers, and the store records accumulate in.
pub struct CollectionSession {
    config: AppConfig,
    source: Arc<dyn TelemetrySource>,
    vehicles: Arc<Vec<String>>,
    store: Arc<RecordStore>,
}

impl CollectionSession {
    /// Connect to the API and register the subscription for every vehicle in
    /// the current timetable.
    pub async fn setup(config: AppConfig) -> Result<Self> {
        let comm_key = read_comm_key(config.api.comm_key_path.as_deref())?;
        let client = TswApiClient::new(&config.api, comm_key)?;
        info!("Connecting to {}", client.base_url());

        let vehicles = client
            .list_timetable()
            .await
            .context("Failed to list timetable vehicles")?;
        info!("Found {} AI vehicles in the timetable", vehicles.len());

        client
            .setup_subscription(&vehicles)
            .await
            .context("Failed to set up subscription")?;

        Ok(Self::from_parts(config, Arc::new(client), vehicles))
    }

    /// Build a session around an already prepared source.
    pub fn from_parts(config: AppConfig, source: Arc<dyn TelemetrySource>, vehicles: Vec<String>) -> Self {
        CollectionSession {
            config,
            source,
            vehicles: Arc::new(vehicles),
            store: Arc::new(RecordStore::new()),
        }
    }

    pub fn vehicles(&self) -> &[String] {
        &self.vehicles
    }

    pub fn store(&self) -> Arc<RecordStore> {
        Arc::clone(&self.store)
    }

    async fn wait_for_stop(&self, mode: RunMode, started: Instant) {
        match mode {
            RunMode::Dashboard => {
                let dashboard = Dashboard::new(self.store(), self.config.collection.dashboard_refresh());
                if let Err(e) = dashboard.run(started).await {
                    warn!("Dashboard stopped: {:#}", e);
                }
            }
            RunMode::Timed(duration) => {
                info!("Collecting for {:?}", duration);
                tokio::select! {
                    _ = sleep(duration) => {}
                    _ = tokio::signal::ctrl_c() => info!("Interrupted, stopping early"),
                }
            }
        }
    }

    /// Poll until `mode` says stop, then export both datasets and the
    /// collection summary.
    ///
    /// A poller that does not finish within the join timeout is aborted and
    /// the records gathered so far are still saved.
    pub async fn run(&self, mode: RunMode) -> Result<SessionReport> {
        self.store.reset();
        let started_at = Local::now();
        let started = Instant::now();

        let interval = self.config.collection.interval();
        let poller = Poller::new(
            Arc::clone(&self.source),
            Arc::clone(&self.vehicles),
            self.store(),
            interval,
        );
        let stats = poller.stats();
        let stop = CancellationToken::new();
        let mut handle = poller.spawn(stop.clone());

        self.wait_for_stop(mode, started).await;
        stop.cancel();

        let join_timeout = self.config.collection.join_timeout();
        let poller_joined = match timeout(join_timeout, &mut handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("Collection task failed: {}", e);
                false
            }
            Err(_) => {
                warn!("Collection task did not stop within {:?}, aborting it", join_timeout);
                handle.abort();
                false
            }
        };
        let finished_at = Local::now();

        let (player, ai) = self.store.take();
        info!("Saving {} player records and {} AI records", player.len(), ai.len());

        let player_file = write_records(&self.config.data.player, &player)
            .context("Failed to save player data")?;
        let ai_file = write_records(&self.config.data.ai, &ai)
            .context("Failed to save AI data")?;

        let summary = SessionSummary {
            started_at,
            finished_at,
            interval_ms: self.config.collection.interval_ms,
            vehicle_count: self.vehicles.len(),
            player_records: player.len(),
            ai_records: ai.len(),
            stats: stats.snapshot(),
            player_file: player_file.clone(),
            ai_file,
            poller_joined,
        };

        let hostname = hostname::get()
            .map_err(|e| anyhow!("Failed to get hostname: {}", e))?
            .to_string_lossy()
            .to_string();
        let summary_file = player_file
            .parent()
            .map(|dir| dir.join(SUMMARY_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SUMMARY_FILE_NAME));
        write_collection_summary(&summary_file, &hostname, &summary)?;
        info!("Collection summary written to {}", summary_file.display());

        info!("DONE!");
        Ok(SessionReport { summary, summary_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::api::{ApiError, MockTelemetrySource};
    use crate::config::DataConfig;
    use crate::test_utils::sample_snapshot;

    fn test_config(dir: &TempDir, ai_file: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.collection.interval_ms = 5;
        config.collection.join_timeout_ms = 500;
        config.data.player.filename = dir.path().join("out").join("player.geojson");
        config.data.ai = DataConfig {
            filename: dir.path().join("out").join(ai_file),
            ..DataConfig::ai_default()
        };
        config
    }

    #[tokio::test]
    async fn test_timed_run_exports_everything() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, "ai.csv");

        let mut mock = MockTelemetrySource::new();
        mock.expect_fetch_snapshot()
            .returning(|| Ok(sample_snapshot(&["RVM_A", "RVM_B"])));

        let vehicles = vec!["RVM_A".to_string(), "RVM_B".to_string()];
        let session = CollectionSession::from_parts(config, Arc::new(mock), vehicles);
        let report = session.run(RunMode::Timed(Duration::from_millis(100))).await.unwrap();

        let summary = &report.summary;
        assert!(summary.poller_joined);
        assert!(summary.player_records >= 2);
        assert_eq!(summary.ai_records, summary.player_records * 2);
        assert_eq!(session.store().counts(), (0, 0));

        let geojson: Value = serde_json::from_str(&std::fs::read_to_string(&summary.player_file).unwrap()).unwrap();
        assert_eq!(geojson["features"].as_array().unwrap().len(), summary.player_records);

        let mut reader = csv::Reader::from_path(&summary.ai_file).unwrap();
        assert_eq!(reader.records().count(), summary.ai_records);

        assert_eq!(report.summary_file, temp_dir.path().join("out").join(SUMMARY_FILE_NAME));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&report.summary_file).unwrap()).unwrap();
        assert_eq!(written["vehicle_count"], 2);
    }

    #[tokio::test]
    async fn test_unreachable_api_still_saves_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, "ai.geojson");

        let mut mock = MockTelemetrySource::new();
        mock.expect_fetch_snapshot()
            .returning(|| Err(ApiError::Timeout { url: "http://127.0.0.1:31270".into() }));

        let session = CollectionSession::from_parts(config, Arc::new(mock), Vec::new());
        let report = session.run(RunMode::Timed(Duration::from_millis(50))).await.unwrap();

        assert_eq!(report.summary.player_records, 0);
        assert!(report.summary.stats.transient_errors >= 1);
        let ai: Value = serde_json::from_str(&std::fs::read_to_string(&report.summary.ai_file).unwrap()).unwrap();
        assert_eq!(ai["features"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_bad_output_format_fails_after_collection() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, "ai.gpkg");

        let mut mock = MockTelemetrySource::new();
        mock.expect_fetch_snapshot().returning(|| Ok(sample_snapshot(&[])));

        let session = CollectionSession::from_parts(config, Arc::new(mock), Vec::new());
        let err = session.run(RunMode::Timed(Duration::from_millis(20))).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to save AI data"));
    }
}
