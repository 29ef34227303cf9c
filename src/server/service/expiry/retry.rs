//! Exponential backoff for provider calls.

use std::{future::Future, time::Duration};

/// Retries a fallible async operation with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubled on each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after a failure on `attempt` (1-based): `base_delay * 2^attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Runs `operation` until it succeeds, fails permanently or `max_attempts` is reached.
    ///
    /// # Arguments
    /// - `label` - Name of the operation used in log lines
    /// - `is_retryable` - Whether an error is worth another attempt
    /// - `operation` - Produces a fresh future per attempt
    ///
    /// # Returns
    /// - `Ok(T)` - The first successful result
    /// - `Err(E)` - The first permanent error or the error of the final attempt
    pub async fn run<T, E, R, F, Fut>(
        &self,
        label: &str,
        is_retryable: R,
        mut operation: F,
    ) -> Result<T, E>
    where
        E: std::fmt::Display,
        R: Fn(&E) -> bool,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if !is_retryable(&err) => {
                    tracing::error!("{} failed permanently on attempt {}: {}", label, attempt, err);
                    return Err(err);
                }
                Err(err) if attempt >= max_attempts => {
                    tracing::error!("{} failed after {} attempts: {}", label, attempt, err);
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        "{} attempt {}/{} failed, retrying in {:?}: {}",
                        label,
                        attempt,
                        max_attempts,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
