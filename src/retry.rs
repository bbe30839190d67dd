// src/retry.rs
use std::fmt::Display;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::config::consts::RETRY_DELAY_SECS;

/// Fixed-backoff retry. `max_attempts == None` retries forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: Option<u32>,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: Duration::from_secs(RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts: Some(max_attempts.max(1)), backoff }
    }

    fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    /// Returns the last error when giving up. Blocks the thread while backing off.
    pub fn run<T, E, F>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if self.allows(attempt) => {
                    warn!("{what}: attempt {attempt} failed: {e}; retrying in {:?}", self.backoff);
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
                Err(e) => {
                    warn!("{what}: giving up after {attempt} attempts: {e}");
                    return Err(e);
                }
            }
        }
    }
}
