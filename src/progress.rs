// src/progress.rs
use std::time::{Duration, Instant};

use tracing::info;

/// Lightweight progress reporting used by long-running batch jobs.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of items still to process.
    fn begin(&mut self, _total: usize) {}

    /// Called when one item's rows and completion mark are on disk.
    fn item_done(&mut self, _key: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Snapshot printed at a reporting checkpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub done: usize,
    pub total: usize,
    pub percent: f64,
    pub per_sec: f64,
    pub eta: Duration,
}

/// Report on the 1st, the 10th, and every 100th item of the session.
pub fn is_checkpoint(done: usize) -> bool {
    done == 1 || done == 10 || (done > 0 && done % 100 == 0)
}

/// Rates come from this session only: elapsed / items done so far.
pub fn checkpoint(done: usize, total: usize, elapsed: Duration) -> Option<Checkpoint> {
    if !is_checkpoint(done) {
        return None;
    }
    let secs = elapsed.as_secs_f64();
    let per_item = secs / done as f64;
    let remaining = total.saturating_sub(done);
    Some(Checkpoint {
        done,
        total,
        percent: if total == 0 { 100.0 } else { done as f64 * 100.0 / total as f64 },
        per_sec: if secs > 0.0 { done as f64 / secs } else { 0.0 },
        eta: Duration::from_secs_f64(per_item * remaining as f64),
    })
}

/// Console sink: logs checkpoints through `tracing`.
pub struct ConsoleProgress {
    label: String,
    started: Instant,
    done: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), started: Instant::now(), done: 0, total: 0 }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.started = Instant::now();
    }

    fn item_done(&mut self, key: &str) {
        self.done += 1;
        if let Some(c) = checkpoint(self.done, self.total, self.started.elapsed()) {
            info!(
                "{}: {}/{} ({:.1}%) last={key} {:.2} items/s, eta {}s",
                self.label, c.done, c.total, c.percent, c.per_sec, c.eta.as_secs()
            );
        }
    }

    fn finish(&mut self) {
        info!("{}: finished {} items in {:.1}s", self.label, self.done, self.started.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoints_at_one_ten_and_hundreds() {
        let hits: Vec<usize> = (0..=350).filter(|&n| is_checkpoint(n)).collect();
        assert_eq!(hits, vec![1, 10, 100, 200, 300]);
    }

    #[test]
    fn eta_uses_session_rate() {
        let c = checkpoint(10, 40, Duration::from_secs(20)).unwrap();
        assert_eq!(c.percent, 25.0);
        assert_eq!(c.per_sec, 0.5);
        assert_eq!(c.eta, Duration::from_secs(60));
        assert!(checkpoint(11, 40, Duration::from_secs(20)).is_none());
    }
}
