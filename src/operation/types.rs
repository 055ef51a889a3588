//! Long-running operation types

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Status of a long-running operation as reported by one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus<R> {
    /// Accepted but not started
    Pending,
    /// Running
    Active,
    /// Finished with a result
    Complete(R),
    /// Finished with a server-provided error message
    Error(String),
}

impl<R> OperationStatus<R> {
    /// Check if the operation has finished either way
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }

    /// Check if the operation completed successfully
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Check if the operation failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Short lowercase name of the status
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete(_) => "complete",
            Self::Error(_) => "error",
        }
    }
}

impl<R> fmt::Display for OperationStatus<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(message) => write!(f, "error: {message}"),
            other => f.write_str(other.label()),
        }
    }
}

/// One observation of an operation: status plus continuation bookmark
///
/// Every poll yields a fresh value; states are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationState<R> {
    /// Current status
    pub status: OperationStatus<R>,
    /// Opaque token to pass to the next poll
    pub bookmark: Option<String>,
}

impl<R> OperationState<R> {
    /// Create a state
    pub fn new(status: OperationStatus<R>, bookmark: Option<String>) -> Self {
        Self { status, bookmark }
    }

    /// A completed state without bookmark
    pub fn complete(result: R) -> Self {
        Self::new(OperationStatus::Complete(result), None)
    }

    /// An active state continuing from `bookmark`
    pub fn active(bookmark: impl Into<String>) -> Self {
        Self::new(OperationStatus::Active, Some(bookmark.into()))
    }
}

/// A server-side job driven by an initiate call and repeated polls
///
/// Implementations perform the requests for a single step and never sleep.
/// Waiting between polls, attempt counting and cancellation belong to
/// [`super::Poller`].
#[async_trait]
pub trait LongRunningOperation: Send + Sync {
    /// Result produced on completion
    type Output: Send;

    /// Name used in logs
    fn name(&self) -> &str {
        "operation"
    }

    /// Start the job
    async fn initiate(&self) -> Result<OperationState<Self::Output>>;

    /// Check the job, continuing from the latest bookmark
    async fn poll(&self, bookmark: Option<&str>) -> Result<OperationState<Self::Output>>;
}
