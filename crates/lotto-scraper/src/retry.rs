//! Retry with exponential back-off and jitter.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries only
//! errors that report themselves [`Transient`]. Structural page failures are
//! returned immediately: fetching the same markup again will not fix them.

use std::future::Future;
use std::time::Duration;

use lotto_core::AppConfig;

use crate::error::ScraperError;
use crate::extract::ExtractError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Errors that may succeed if the same request is repeated later.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for ScraperError {
    /// Timeouts, connection failures, 429 and 5xx are transient. Bad JSON,
    /// 4xx and configuration errors are not.
    fn is_transient(&self) -> bool {
        match self {
            ScraperError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ScraperError::RateLimited { .. } => true,
            ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
            ScraperError::Deserialize { .. } | ScraperError::InvalidBaseUrl { .. } => false,
        }
    }
}

impl Transient for ExtractError {
    /// Only the fetch step is worth repeating.
    fn is_transient(&self) -> bool {
        match self {
            ExtractError::Fetch { source, .. } => source.is_transient(),
            ExtractError::Parse { .. }
            | ExtractError::Table { .. }
            | ExtractError::SuspectedFailure { .. } => false,
        }
    }
}

/// How many extra attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the n-th retry is `backoff_base_ms * 2^(n-1)` ± 25 %.
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }

    /// Sleep before retry number `attempt` (1-based), jittered to ±25 %.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn delay_ms(&self, attempt: u32) -> u64 {
        let computed = self
            .backoff_base_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
        let capped = computed.min(MAX_DELAY_MS);
        (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64
    }
}

/// Runs `operation`, retrying transient failures per `policy`.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error immediately.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = policy.delay_ms(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms,
                    error = %err,
                    "transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
