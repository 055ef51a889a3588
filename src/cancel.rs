//! Cooperative cancellation helpers
//!
//! Every suspension point in the SDK (HTTP calls, retry delays, poll
//! intervals) races against a caller-supplied [`CancellationToken`]. When the
//! token fires first the pending future is dropped, which aborts any
//! in-flight request, and [`Error::Cancelled`] is returned.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

pub use tokio_util::sync::CancellationToken;

/// Run a fallible future unless the token is cancelled first
pub async fn guard<T, F>(token: Option<&CancellationToken>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match token {
        Some(token) => {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
            tokio::select! {
                biased;
                () = token.cancelled() => Err(Error::Cancelled),
                result = fut => result,
            }
        }
        None => fut.await,
    }
}

/// Sleep for `duration`, waking early with [`Error::Cancelled`] on cancellation
pub async fn sleep(duration: Duration, token: Option<&CancellationToken>) -> Result<()> {
    guard(token, async {
        tokio::time::sleep(duration).await;
        Ok(())
    })
    .await
}

/// Fail fast when the token has already fired
pub fn check(token: Option<&CancellationToken>) -> Result<()> {
    match token {
        Some(token) if token.is_cancelled() => Err(Error::Cancelled),
        _ => Ok(()),
    }
}
