//! Bounded exponential backoff for outbound calls.
//!
//! Attempt `k` (1-indexed) waits `unit * 2^k` before it is sent, so the
//! default schedule is 2s, 4s, 8s. There is no jitter. Only errors that
//! [`DirectoryError::is_transient`] accepts are retried; a 4xx answer goes
//! straight back to the caller.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{DirectoryError, Result};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_retries: u32,
    unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_UNIT)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, unit: Duration) -> Self {
        Self { max_retries, unit }
    }

    /// A policy that sends every request exactly once.
    pub fn none() -> Self {
        Self::new(0, DEFAULT_BACKOFF_UNIT)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Wait before retry `attempt` (1-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.unit.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds, fails permanently, or the retries run out.
    ///
    /// Backoff sleeps stop early with [`DirectoryError::Cancelled`] once
    /// `cancel` fires.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let wait = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        error = %e,
                        "[Retry] Attempt #{attempt}, waiting {} sec",
                        wait.as_secs_f64()
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(DirectoryError::Cancelled),
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
