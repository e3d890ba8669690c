//! Retry policy with exponential backoff and jitter.
//!
//! [`retry`] and [`retry_async`] wrap a zero-argument unit of work. A failure is
//! retried when it is a connection-level error and the config opts in, or when
//! it carries a status code matching one of the retryable patterns. Retrying
//! stops once the next sleep would push the total elapsed time past
//! `max_elapsed_time`; the last failure is then returned unchanged.

use crate::{matcher::match_status_codes, Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Status patterns retried by default when a call enables retries.
pub const DEFAULT_RETRY_STATUS_CODES: &[&str] = &["429", "500", "502", "503", "504"];

/// Shape of the delay between attempts.
///
/// # Examples
///
/// ```
/// use dateno::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// // 500ms, 750ms, 1125ms, ... capped at 60s, for at most 5 minutes
/// let backoff = BackoffStrategy {
///     initial_interval: Duration::from_millis(500),
///     max_interval: Duration::from_secs(60),
///     exponent: 1.5,
///     max_elapsed_time: Duration::from_secs(300),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffStrategy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound on a single delay, before jitter.
    pub max_interval: Duration,
    /// Multiplier applied for each further retry.
    pub exponent: f64,
    /// Bound on the whole retry sequence, not on a single attempt.
    pub max_elapsed_time: Duration,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            exponent: 1.5,
            max_elapsed_time: Duration::from_secs(3600),
        }
    }
}

impl BackoffStrategy {
    /// Delay before retry number `retry` (0-based), without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = retry.min(i32::MAX as u32) as i32;
        let factor = self.exponent.max(1.0).powi(exponent);
        let millis = (self.initial_interval.as_millis() as f64 * factor)
            .min(self.max_interval.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }

    /// Delay before retry number `retry` (0-based), with up to 10% jitter added.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let delay = self.base_delay(retry);
        let jitter_factor = rand::thread_rng().gen_range(0.0..=0.1);
        delay + delay.mul_f64(jitter_factor)
    }
}

/// Defines whether and how failed calls are retried.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryStrategy {
    /// Do not retry failed requests.
    #[default]
    None,

    /// Retry with exponentially increasing delays.
    Backoff(BackoffStrategy),
}

/// Retry configuration for the SDK or a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryConfig {
    pub strategy: RetryStrategy,
    /// Retry failures that happened before any response was received.
    pub retry_connection_errors: bool,
}

impl RetryConfig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn backoff(backoff: BackoffStrategy, retry_connection_errors: bool) -> Self {
        Self {
            strategy: RetryStrategy::Backoff(backoff),
            retry_connection_errors,
        }
    }
}

/// A retry configuration paired with the status patterns it retries.
#[derive(Debug, Clone, PartialEq)]
pub struct Retries {
    pub config: RetryConfig,
    pub status_codes: Vec<String>,
}

impl Retries {
    pub fn new(
        config: RetryConfig,
        status_codes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            config,
            status_codes: status_codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if a response with `status` should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        let patterns: Vec<&str> = self.status_codes.iter().map(String::as_str).collect();
        match_status_codes(&patterns, status)
    }

    /// Returns `true` if `error` qualifies for another attempt.
    pub fn should_retry(&self, error: &Error) -> bool {
        if error.is_connection_error() {
            return self.config.retry_connection_errors;
        }

        match error {
            Error::Default { status, .. }
            | Error::Api { status, .. }
            | Error::Validation { status, .. }
            | Error::RetryableStatus { status, .. } => self.is_retryable_status(status.as_u16()),
            _ => false,
        }
    }

    fn backoff(&self) -> Option<&BackoffStrategy> {
        match &self.config.strategy {
            RetryStrategy::None => None,
            RetryStrategy::Backoff(backoff) => Some(backoff),
        }
    }

    /// Decides the next delay, or `None` if `error` must be returned as is.
    fn next_delay(&self, error: &Error, retry: u32, elapsed: Duration) -> Option<Duration> {
        let backoff = self.backoff()?;

        if !self.should_retry(error) {
            return None;
        }

        let delay = backoff.delay_for_retry(retry);
        if elapsed + delay > backoff.max_elapsed_time {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis(),
                max_elapsed_ms = backoff.max_elapsed_time.as_millis(),
                retries = retry,
                "Retry budget exhausted"
            );
            return None;
        }

        Some(delay)
    }
}

/// Runs `operation`, retrying per `retries` with a blocking sleep.
pub fn retry<T, F>(mut operation: F, retries: &Retries) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let start = std::time::Instant::now();
    let mut retry = 0;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let Some(delay) = retries.next_delay(&e, retry, start.elapsed()) else {
                    return Err(e);
                };

                tracing::warn!(
                    error = %e,
                    delay_ms = delay.as_millis(),
                    attempt = retry + 1,
                    "Retrying request after delay"
                );

                std::thread::sleep(delay);
                retry += 1;
            }
        }
    }
}

/// Runs `operation`, retrying per `retries` with a non-blocking sleep.
pub async fn retry_async<T, F, Fut>(mut operation: F, retries: &Retries) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = tokio::time::Instant::now();
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let Some(delay) = retries.next_delay(&e, retry, start.elapsed()) else {
                    return Err(e);
                };

                tracing::warn!(
                    error = %e,
                    delay_ms = delay.as_millis(),
                    attempt = retry + 1,
                    "Retrying request after delay"
                );

                tokio::time::sleep(delay).await;
                retry += 1;
            }
        }
    }
}
