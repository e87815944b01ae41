//! Terminal status line shown while a collection is running.
//!
//! The dashboard redraws a single line on stderr with the elapsed time and
//! the number of records held by the store. Pressing Enter or Ctrl+C stops
//! the collection.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::collectors::store::RecordStore;

const TITLE: &str = "DATA COLLECTOR";
const STOP_HINT: &str = "[Enter / Ctrl+C] STOP & SAVE";

/// Format a duration as `HH:MM:SS`. Hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Format a count with `,` thousands separators.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render_status(elapsed: Duration, player: usize, ai: usize) -> String {
    format!(
        "{}  {}  PLAYER {}  AI VEHICLES {}  {}",
        TITLE,
        format_elapsed(elapsed),
        format_count(player),
        format_count(ai),
        STOP_HINT
    )
}

/// Read stdin on a plain thread and report the first line. A closed
/// channel disables the Enter branch, so end of input never stops.
fn spawn_enter_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);
    let spawned = thread::Builder::new()
        .name("stdin-listener".to_string())
        .spawn(move || {
            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                Ok(0) => debug!("stdin closed; Enter cannot stop the collection"),
                Ok(_) => {
                    let _ = tx.blocking_send(());
                }
                Err(e) => debug!("Failed to read stdin: {}", e),
            }
        });

    if let Err(e) = spawned {
        warn!("Could not listen for Enter, use Ctrl+C to stop: {}", e);
    }
    rx
}

/// Live status display bound to a record store
pub struct Dashboard {
    store: Arc<RecordStore>,
    refresh: Duration,
}

impl Dashboard {
    pub fn new(store: Arc<RecordStore>, refresh: Duration) -> Self {
        Dashboard { store, refresh }
    }

    fn draw(&self, started: Instant) -> io::Result<()> {
        let (player, ai) = self.store.counts();
        let mut stderr = io::stderr().lock();
        write!(stderr, "\r\x1b[2K{}", render_status(started.elapsed(), player, ai))?;
        stderr.flush()
    }

    fn draw_saving(&self) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "\r\x1b[2K{}  SAVING...", TITLE)?;
        stderr.flush()
    }

    /// Redraw until the user asks to stop. Returns once Enter or Ctrl+C
    /// has been seen and the final "SAVING..." line is printed.
    pub async fn run(&self, started: Instant) -> Result<()> {
        let mut enter = spawn_enter_listener();
        let mut ticker = interval(self.refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                signal = &mut ctrl_c => {
                    signal.context("Failed to listen for Ctrl+C")?;
                    break;
                }
                Some(()) = enter.recv() => break,
                _ = ticker.tick() => {
                    self.draw(started).context("Failed to draw dashboard")?;
                }
            }
        }

        self.draw(started).context("Failed to draw dashboard")?;
        self.draw_saving().context("Failed to draw dashboard")?;
        Ok(())
    }
}
