//! Opt-in retry for idempotent requests.
//!
//! The lock protocol is never retried: only GET and HEAD requests go through
//! the policy, and only when a [`RetryConfig`] is set on the client.

use rand::Rng;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff strategy to use.
    pub backoff: BackoffStrategy,
    /// Upper bound for a server-provided Retry-After.
    pub max_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff: BackoffStrategy::Exponential {
                factor: 2.0,
                jitter: true,
            },
            max_retry_after: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of retries.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Backoff strategy for determining retry delays.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    /// Same delay before every retry.
    Constant,
    /// `initial * factor^attempt`, optionally plus up to 100% random jitter.
    Exponential { factor: f64, jitter: bool },
}

impl BackoffStrategy {
    /// Delay before retry number `attempt` (0-indexed), capped at `max_delay`.
    pub fn delay(&self, attempt: u32, initial_delay: Duration, max_delay: Duration) -> Duration {
        let delay = match *self {
            BackoffStrategy::Constant => initial_delay,
            BackoffStrategy::Exponential { factor, jitter } => {
                let base = initial_delay.as_secs_f64() * factor.powi(attempt as i32);
                let extra = if jitter {
                    rand::rng().random::<f64>() * base
                } else {
                    0.0
                };
                Duration::from_secs_f64((base + extra).min(max_delay.as_secs_f64()))
            }
        };
        delay.min(max_delay)
    }
}

/// Tracks attempts for a single logical request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: u32,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Number of retries already taken.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay before the next retry, or `None` once the budget is spent.
    pub fn next_delay(&mut self, retry_after: Option<Duration>) -> Option<Duration> {
        if self.attempt >= self.config.max_attempts {
            return None;
        }
        let delay = match retry_after {
            Some(server_delay) => server_delay.min(self.config.max_retry_after),
            None => self.config.backoff.delay(
                self.attempt,
                self.config.initial_delay,
                self.config.max_delay,
            ),
        };
        self.attempt += 1;
        Some(delay)
    }
}
