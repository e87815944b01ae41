//! Shared in-memory accumulation of collected records.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::models::{AiRecord, PlayerRecord};

/// Records accumulated during a session.
///
/// The poller appends under short-lived locks; the dashboard only reads the
/// atomic counters and never touches the locks.
#[derive(Debug, Default)]
pub struct RecordStore {
    player: Mutex<Vec<PlayerRecord>>,
    ai: Mutex<Vec<AiRecord>>,
    player_count: AtomicUsize,
    ai_count: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Records stay readable after a poller panic
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the records of one poll
    pub fn push_tick(&self, player: Option<PlayerRecord>, ai: Vec<AiRecord>) {
        if let Some(record) = player {
            lock(&self.player).push(record);
            self.player_count.fetch_add(1, Ordering::SeqCst);
        }
        if !ai.is_empty() {
            let added = ai.len();
            lock(&self.ai).extend(ai);
            self.ai_count.fetch_add(added, Ordering::SeqCst);
        }
    }

    /// (player records, AI records) collected so far
    pub fn counts(&self) -> (usize, usize) {
        (
            self.player_count.load(Ordering::SeqCst),
            self.ai_count.load(Ordering::SeqCst),
        )
    }

    pub fn reset(&self) {
        lock(&self.player).clear();
        lock(&self.ai).clear();
        self.player_count.store(0, Ordering::SeqCst);
        self.ai_count.store(0, Ordering::SeqCst);
    }

    /// Move all records out, leaving the store empty
    pub fn take(&self) -> (Vec<PlayerRecord>, Vec<AiRecord>) {
        let player = std::mem::take(&mut *lock(&self.player));
        let ai = std::mem::take(&mut *lock(&self.ai));
        self.player_count.store(0, Ordering::SeqCst);
        self.ai_count.store(0, Ordering::SeqCst);
        (player, ai)
    }
}
