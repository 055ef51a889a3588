//! Transient-error retry wrapper
//!
//! The HTTP client never retries on its own. Call sites that know their
//! request is safe to repeat wrap it in [`with_retry`] with an explicit
//! [`RetryPolicy`].

use crate::cancel::{self, CancellationToken};
use crate::error::{is_transient_status, Error, Result};
use crate::types::BackoffType;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type StatusPredicate = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// How often and on which failures to retry
///
/// Stateless: one policy can be shared by any number of unrelated calls.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub delay: Duration,
    /// How the delay grows between retries
    pub backoff: BackoffType,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Also retry network-level failures (no HTTP status)
    pub retry_transport_errors: bool,
    retryable: StatusPredicate,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
            backoff: BackoffType::Constant,
            max_delay: Duration::from_secs(30),
            retry_transport_errors: false,
            retryable: Arc::new(is_transient_status),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts on 500/502/503/504
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Run exactly once
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Set the delay before the first retry
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the backoff strategy and delay cap
    #[must_use]
    pub fn backoff(mut self, backoff: BackoffType, max_delay: Duration) -> Self {
        self.backoff = backoff;
        self.max_delay = max_delay;
        self
    }

    /// Retry only on these statuses
    #[must_use]
    pub fn retry_on(mut self, statuses: &[u16]) -> Self {
        let statuses = statuses.to_vec();
        self.retryable = Arc::new(move |status| statuses.contains(&status));
        self
    }

    /// Retry when `predicate` accepts the status
    #[must_use]
    pub fn retry_if(mut self, predicate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        self.retryable = Arc::new(predicate);
        self
    }

    /// Also retry transport failures
    #[must_use]
    pub fn retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    /// Check if `status` is in the retryable class
    pub fn is_retryable_status(&self, status: u16) -> bool {
        (self.retryable)(status)
    }

    /// Check if `error` warrants another attempt
    pub fn should_retry(&self, error: &Error) -> bool {
        match error {
            Error::Api { status, .. } => self.is_retryable_status(*status),
            Error::Transport(e) => {
                if let Some(status) = e.status() {
                    self.is_retryable_status(status.as_u16())
                } else {
                    self.retry_transport_errors
                }
            }
            _ => false,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let step = attempt.saturating_sub(1);
        let delay = match self.backoff {
            BackoffType::Constant => Some(self.delay),
            BackoffType::Linear => self.delay.checked_mul(step + 1),
            BackoffType::Exponential => self.delay.checked_mul(2u32.saturating_pow(step)),
        };

        delay.map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("backoff", &self.backoff)
            .field("max_delay", &self.max_delay)
            .field("retry_transport_errors", &self.retry_transport_errors)
            .finish_non_exhaustive()
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts
///
/// The most recent error is returned unchanged so the original status stays
/// visible to the caller. Attempts are strictly sequential.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: Option<&CancellationToken>,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match cancel::guard(cancel, operation()).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts && policy.should_retry(&e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, max_attempts, e, delay
                );
                cancel::sleep(delay, cancel).await?;
                attempt += 1;
            }
            Err(e) => {
                if attempt > 1 {
                    warn!("Giving up after {} attempts: {}", attempt, e);
                }
                return Err(e);
            }
        }
    }
}
