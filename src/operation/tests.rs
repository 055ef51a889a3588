//! Tests for operation module

use super::*;
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Operation that replays scripted states and records the bookmarks it saw
struct Scripted {
    initial: Mutex<Option<Result<OperationState<String>>>>,
    polls: Mutex<VecDeque<Result<OperationState<String>>>>,
    seen_bookmarks: Mutex<Vec<Option<String>>>,
    initiate_calls: Mutex<u32>,
}

impl Scripted {
    fn new(
        initial: Result<OperationState<String>>,
        polls: Vec<Result<OperationState<String>>>,
    ) -> Self {
        Self {
            initial: Mutex::new(Some(initial)),
            polls: Mutex::new(polls.into()),
            seen_bookmarks: Mutex::new(Vec::new()),
            initiate_calls: Mutex::new(0),
        }
    }

    fn poll_count(&self) -> usize {
        self.seen_bookmarks.lock().unwrap().len()
    }
}

#[async_trait]
impl LongRunningOperation for Scripted {
    type Output = String;

    fn name(&self) -> &str {
        "scripted"
    }

    async fn initiate(&self) -> Result<OperationState<String>> {
        *self.initiate_calls.lock().unwrap() += 1;
        self.initial
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(Error::Other("initiated twice".into())))
    }

    async fn poll(&self, bookmark: Option<&str>) -> Result<OperationState<String>> {
        self.seen_bookmarks
            .lock()
            .unwrap()
            .push(bookmark.map(String::from));
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OperationState::new(OperationStatus::Active, None)))
    }
}

fn fast(max_attempts: u32) -> Poller {
    Poller::new(PollerConfig::new(max_attempts, Duration::from_millis(1)))
}

#[test]
fn test_status_helpers() {
    let complete: OperationStatus<u32> = OperationStatus::Complete(1);
    assert!(complete.is_terminal());
    assert!(complete.is_complete());
    assert_eq!(complete.label(), "complete");

    let error: OperationStatus<u32> = OperationStatus::Error("boom".into());
    assert!(error.is_terminal());
    assert!(error.is_error());
    assert_eq!(error.to_string(), "error: boom");

    assert!(!OperationStatus::<u32>::Active.is_terminal());
    assert!(!OperationStatus::<u32>::Pending.is_terminal());
    assert_eq!(OperationStatus::<u32>::Pending.to_string(), "pending");
}

#[test]
fn test_state_constructors() {
    let state = OperationState::active("bm-1");
    assert_eq!(state.status, OperationStatus::<()>::Active);
    assert_eq!(state.bookmark.as_deref(), Some("bm-1"));

    let state = OperationState::complete(5);
    assert_eq!(state.status, OperationStatus::Complete(5));
    assert!(state.bookmark.is_none());
}

#[tokio::test]
async fn test_completes_after_two_polls() {
    let op = Scripted::new(
        Ok(OperationState::active("b0")),
        vec![
            Ok(OperationState::active("b1")),
            Ok(OperationState::new(
                OperationStatus::Complete("done".into()),
                Some("b2".into()),
            )),
        ],
    );

    let result = fast(10).run(&op, None).await.unwrap();

    assert_eq!(result, "done");
    assert_eq!(*op.initiate_calls.lock().unwrap(), 1);
    assert_eq!(op.poll_count(), 2);
}

#[tokio::test]
async fn test_latest_bookmark_is_passed() {
    let op = Scripted::new(
        Ok(OperationState::active("b0")),
        vec![
            Ok(OperationState::active("b1")),
            Ok(OperationState::new(OperationStatus::Pending, None)),
            Ok(OperationState::complete("done".into())),
        ],
    );

    fast(10).run(&op, None).await.unwrap();

    assert_eq!(
        *op.seen_bookmarks.lock().unwrap(),
        vec![Some("b0".into()), Some("b1".into()), Some("b1".into())]
    );
}

#[tokio::test]
async fn test_complete_on_initiate_skips_polling() {
    let op = Scripted::new(Ok(OperationState::complete("instant".into())), vec![]);

    let result = fast(10).run(&op, None).await.unwrap();

    assert_eq!(result, "instant");
    assert_eq!(op.poll_count(), 0);
}

#[tokio::test]
async fn test_error_status_short_circuits() {
    let op = Scripted::new(
        Ok(OperationState::active("b0")),
        vec![
            Ok(OperationState::new(
                OperationStatus::Error("disk full".into()),
                None,
            )),
            Ok(OperationState::complete("never".into())),
        ],
    );

    let err = fast(10).run(&op, None).await.unwrap_err();

    assert!(matches!(err, Error::Operation { ref message } if message == "disk full"));
    assert_eq!(op.poll_count(), 1);
}

#[tokio::test]
async fn test_error_on_initiate() {
    let op = Scripted::new(
        Ok(OperationState::new(
            OperationStatus::Error("bad dump options".into()),
            None,
        )),
        vec![],
    );

    let err = fast(10).run(&op, None).await.unwrap_err();

    assert!(matches!(err, Error::Operation { .. }));
    assert_eq!(op.poll_count(), 0);
}

#[tokio::test]
async fn test_exhausted_attempts_time_out() {
    let op = Scripted::new(Ok(OperationState::active("b0")), vec![]);

    let err = fast(3).run(&op, None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::PollTimeout { attempts: 3, ref last_status } if last_status == "active"
    ));
    assert_eq!(op.poll_count(), 3);
}

#[tokio::test]
async fn test_zero_attempts_times_out_with_initiate_status() {
    let op = Scripted::new(
        Ok(OperationState::new(OperationStatus::Pending, None)),
        vec![],
    );

    let err = fast(0).run(&op, None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::PollTimeout { attempts: 0, ref last_status } if last_status == "pending"
    ));
    assert_eq!(op.poll_count(), 0);
}

#[tokio::test]
async fn test_transport_error_during_poll_propagates() {
    let op = Scripted::new(
        Ok(OperationState::active("b0")),
        vec![Err(Error::api(502, vec![]))],
    );

    let err = fast(5).run(&op, None).await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(op.poll_count(), 1);
}

#[tokio::test]
async fn test_cancel_during_interval() {
    let op = Scripted::new(Ok(OperationState::active("b0")), vec![]);
    let poller = Poller::new(PollerConfig::new(100, Duration::from_secs(30)));
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        child.cancel();
    });

    let start = std::time::Instant::now();
    let err = poller.run(&op, Some(&token)).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(op.poll_count(), 0);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancelled_before_initiate() {
    let op = Scripted::new(Ok(OperationState::complete("x".into())), vec![]);
    let token = CancellationToken::new();
    token.cancel();

    let err = fast(1).run(&op, Some(&token)).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(*op.initiate_calls.lock().unwrap(), 0);
}
