use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, TelemetrySource};
use crate::collectors::store::RecordStore;
use crate::telemetry::{ai_records, player_record, TelemetryError};

/// Counters updated by the poll loop.
#[derive(Debug, Default)]
pub struct PollStats {
    polls: AtomicU64,
    snapshots: AtomicU64,
    transient_errors: AtomicU64,
    decode_errors: AtomicU64,
    extraction_errors: AtomicU64,
}

/// Point-in-time copy of [`PollStats`]
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PollStatsSnapshot {
    pub polls: u64,
    pub snapshots: u64,
    pub transient_errors: u64,
    pub decode_errors: u64,
    pub extraction_errors: u64,
}

impl PollStats {
    pub fn snapshot(&self) -> PollStatsSnapshot {
        PollStatsSnapshot {
            polls: self.polls.load(Ordering::SeqCst),
            snapshots: self.snapshots.load(Ordering::SeqCst),
            transient_errors: self.transient_errors.load(Ordering::SeqCst),
            decode_errors: self.decode_errors.load(Ordering::SeqCst),
            extraction_errors: self.extraction_errors.load(Ordering::SeqCst),
        }
    }
}

/// Background producer: fetches a subscription snapshot every `interval`
/// and appends the extracted records to the store.
pub struct Poller {
    source: Arc<dyn TelemetrySource>,
    vehicles: Arc<Vec<String>>,
    store: Arc<RecordStore>,
    stats: Arc<PollStats>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        vehicles: Arc<Vec<String>>,
        store: Arc<RecordStore>,
        interval: Duration,
    ) -> Self {
        Poller {
            source,
            vehicles,
            store,
            stats: Arc::new(PollStats::default()),
            interval,
        }
    }

    pub fn stats(&self) -> Arc<PollStats> {
        Arc::clone(&self.stats)
    }

    fn record_api_error(&self, err: &ApiError) {
        if err.is_transient() {
            self.stats.transient_errors.fetch_add(1, Ordering::SeqCst);
            debug!("Poll skipped: {}", err);
        } else {
            let n = self.stats.decode_errors.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 || n % 100 == 0 {
                warn!("Poll failed ({} so far): {}", n, err);
            } else {
                debug!("Poll failed: {}", err);
            }
        }
    }

    fn record_extraction_error(&self, err: &TelemetryError) {
        let n = self.stats.extraction_errors.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 1 || n % 100 == 0 {
            warn!("Player record skipped ({} so far): {}", n, err);
        } else {
            debug!("Player record skipped: {}", err);
        }
    }

    /// Fetch one snapshot and store its records.
    ///
    /// A player record that cannot be extracted is skipped without dropping
    /// the AI records of the same snapshot.
    pub async fn poll_once(&self) -> Result<(), ApiError> {
        self.stats.polls.fetch_add(1, Ordering::SeqCst);

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.record_api_error(&e);
                return Err(e);
            }
        };
        self.stats.snapshots.fetch_add(1, Ordering::SeqCst);

        let collected_at = Local::now();
        let player = match player_record(&snapshot, collected_at) {
            Ok(record) => Some(record),
            Err(e) => {
                self.record_extraction_error(&e);
                None
            }
        };
        let ai = ai_records(collected_at, &self.vehicles, &snapshot);

        self.store.push_tick(player, ai);
        Ok(())
    }

    /// Poll until `stop` is cancelled. Both the in-flight request and the
    /// sleep between polls end as soon as `stop` fires.
    pub async fn run(self, stop: CancellationToken) {
        info!("Starting data collection loop ({:?} interval)", self.interval);

        while !stop.is_cancelled() {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = self.poll_once() => {}
            }

            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        let stats = self.stats.snapshot();
        info!(
            "Collection loop finished: {} polls, {} snapshots, {} transient errors",
            stats.polls, stats.snapshots, stats.transient_errors
        );
    }

    pub fn spawn(self, stop: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(stop))
    }
}
