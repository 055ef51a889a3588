//! Poll loop for long-running operations

use super::types::{LongRunningOperation, OperationState, OperationStatus};
use crate::cancel::{self, CancellationToken};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Maximum number of polls after the initiate call
    pub max_attempts: u32,
    /// Wait before each poll
    pub interval: Duration,
}

impl PollerConfig {
    /// Create a polling budget
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Drives a [`LongRunningOperation`] to a terminal state
#[derive(Debug, Clone)]
pub struct Poller {
    config: PollerConfig,
}

impl Poller {
    /// Create a poller with the given budget
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Get the polling budget
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Initiate `op` and poll until it completes
    ///
    /// Returns the result immediately when the initiate call already
    /// reports completion. An `Error` status fails at once with
    /// [`Error::Operation`] and is never retried. Running out of polls fails
    /// with [`Error::PollTimeout`] naming the last status seen.
    pub async fn run<O>(&self, op: &O, cancel: Option<&CancellationToken>) -> Result<O::Output>
    where
        O: LongRunningOperation + ?Sized,
    {
        let name = op.name().to_string();
        let state = cancel::guard(cancel, op.initiate()).await?;
        debug!("{} initiated: {}", name, state.status);

        let OperationState {
            status,
            mut bookmark,
        } = state;
        let mut last_status = match status {
            OperationStatus::Complete(result) => {
                info!("{} completed without polling", name);
                return Ok(result);
            }
            OperationStatus::Error(message) => {
                warn!("{} failed on initiate: {}", name, message);
                return Err(Error::operation(message));
            }
            other => other.label(),
        };

        for attempt in 1..=self.config.max_attempts {
            cancel::sleep(self.config.interval, cancel).await?;

            let state = cancel::guard(cancel, op.poll(bookmark.as_deref())).await?;
            debug!(
                "{} poll {}/{}: {}",
                name, attempt, self.config.max_attempts, state.status
            );

            if state.bookmark.is_some() {
                bookmark = state.bookmark;
            }

            match state.status {
                OperationStatus::Complete(result) => {
                    info!("{} completed after {} polls", name, attempt);
                    return Ok(result);
                }
                OperationStatus::Error(message) => {
                    warn!("{} failed after {} polls: {}", name, attempt, message);
                    return Err(Error::operation(message));
                }
                other => last_status = other.label(),
            }
        }

        warn!(
            "{} still {} after {} polls",
            name, last_status, self.config.max_attempts
        );
        Err(Error::PollTimeout {
            attempts: self.config.max_attempts,
            last_status: last_status.to_string(),
        })
    }
}
