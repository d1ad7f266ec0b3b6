// src/batch/status.rs

//! Live status line for an in-flight batch.
//!
//! Purely observational: renders the still-pending task names to stderr
//! every 100ms while the aggregator drains. Callers only spawn the reporter
//! when stderr is a TTY.

use std::collections::BTreeSet;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::interval;

const TICK: Duration = Duration::from_millis(100);

/// The set of task names not yet reported. Shrinks monotonically as results
/// arrive; empty at the end of a successful drain.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    inner: Arc<Mutex<BTreeSet<String>>>,
}

impl PendingSet {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(names.into_iter().collect())),
        }
    }

    pub fn remove(&self, name: &str) {
        self.lock().remove(name);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether stderr is a TTY (progress/status output belongs there so stdout
/// stays clean for the per-task report lines).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Spawn the periodic status renderer. Abort the returned handle (and call
/// [`clear_status_line`]) once the batch has drained.
pub fn spawn_status_reporter(pending: PendingSet, started: Instant) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(TICK);
        loop {
            ticker.tick().await;

            let names = pending.snapshot();
            let line = format!(
                "{:.1}s [{}]",
                started.elapsed().as_secs_f64(),
                names.join(", ")
            );

            let cols = crossterm::terminal::size()
                .map(|(width, _)| width as usize)
                .unwrap_or(80);

            let mut stderr = io::stderr();
            let _ = write!(stderr, "\r\x1b[K{}", truncate_to(&line, cols));
            let _ = stderr.flush();
        }
    })
}

/// Clear the status line so a result line can be printed in its place.
pub fn clear_status_line() {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "\r\x1b[K");
    let _ = stderr.flush();
}

fn truncate_to(line: &str, cols: usize) -> String {
    if line.chars().count() <= cols {
        return line.to_string();
    }
    let mut out: String = line.chars().take(cols.saturating_sub(1)).collect();
    out.push('…');
    out
}
