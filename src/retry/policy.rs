//! Retry Mechanism Module
//!
//! Caller-driven retry of whole sequencing passes. A pass that ends in a
//! transient exhaustion (some candidate was still loading, timed out or
//! returned a temporary 5xx) is re-run from the first candidate after a fixed
//! delay, up to a ceiling of extra passes. Success and non-transient
//! exhaustion end the loop immediately.

use backoff::backoff::{Backoff, Constant};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::defaults;
use crate::types::SequenceResult;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Passes allowed after the first one
    pub max_extra_attempts: u32,
    /// Fixed delay between passes
    pub delay: Duration,
    /// Maximum jitter as a fraction of the delay (0.0 to 1.0); 0.0 keeps the delay fixed
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_extra_attempts: defaults::retry::MAX_EXTRA_ATTEMPTS,
            delay: defaults::retry::DELAY,
            jitter_factor: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::default().with_max_extra_attempts(0)
    }

    /// Set the number of extra passes
    pub const fn with_max_extra_attempts(mut self, attempts: u32) -> Self {
        self.max_extra_attempts = attempts;
        self
    }

    /// Set the delay between passes
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set jitter factor
    pub const fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Total passes the loop may run.
    pub fn max_passes(&self) -> u32 {
        self.max_extra_attempts.saturating_add(1)
    }

    /// Whether a finished pass warrants another one.
    pub fn should_retry(&self, result: &SequenceResult, extra_attempts_used: u32) -> bool {
        result.is_transient_exhaustion() && extra_attempts_used < self.max_extra_attempts
    }

    fn schedule(&self) -> Constant {
        Constant::new(self.delay)
    }

    /// Add jitter to a delay
    fn add_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor <= 0.0 {
            return delay;
        }
        let mut rng = rand::thread_rng();
        let jitter_range = delay.as_millis() as f64 * self.jitter_factor;
        let jitter = rng.gen_range(-jitter_range..=jitter_range);

        let new_delay = delay.as_millis() as f64 + jitter;
        Duration::from_millis(new_delay.max(0.0) as u64)
    }
}

/// Re-runs a sequencing pass according to a `RetryPolicy`.
#[derive(Debug, Clone, Default)]
pub struct RetryLoop {
    policy: RetryPolicy,
}

impl RetryLoop {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `pass` until it succeeds, fails non-transiently, or the ceiling is
    /// reached. The result of the last pass is returned as-is; on the ceiling
    /// that is the final pass's exhaustion.
    pub async fn run<F, Fut>(&self, mut pass: F) -> SequenceResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SequenceResult>,
    {
        let mut schedule = self.policy.schedule();
        let mut extra_attempts_used = 0u32;

        loop {
            let result = pass().await;

            if !self.policy.should_retry(&result, extra_attempts_used) {
                if let SequenceResult::Exhausted(ex) = &result {
                    if ex.is_transient() {
                        tracing::warn!(
                            capability = %ex.capability,
                            passes = extra_attempts_used + 1,
                            attempted = ex.attempted.len(),
                            "retry ceiling reached; giving up"
                        );
                    } else {
                        tracing::debug!(
                            capability = %ex.capability,
                            "exhaustion is not transient; not retrying"
                        );
                    }
                }
                return result;
            }

            let delay = schedule
                .next_backoff()
                .map(|d| self.policy.add_jitter(d))
                .unwrap_or(self.policy.delay);
            extra_attempts_used += 1;
            tracing::info!(
                retry = extra_attempts_used,
                max = self.policy.max_extra_attempts,
                delay_ms = delay.as_millis() as u64,
                "upstream still loading; retrying full pass after delay"
            );
            sleep(delay).await;
        }
    }
}
