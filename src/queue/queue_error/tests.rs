use std::{error::Error, io, sync::Arc};

use super::QueueError;
use crate::queue::{CloseReason, TerminalCause};

#[test]
fn closed_error_chains_to_the_close_reason() {
  let cause: TerminalCause = Arc::new(io::Error::other("boom"));
  let err = QueueError::Closed(Some(CloseReason::new(cause)));

  assert_eq!(err.to_string(), "stream queue closed");
  assert_eq!(err.source().unwrap().to_string(), "boom");
  assert!(err.close_reason().is_some());
}

#[test]
fn plain_closed_error_stands_alone() {
  let err: QueueError = QueueError::Closed(None);
  assert_eq!(err.to_string(), "stream queue closed");
  assert!(err.source().is_none());
  assert!(err.close_reason().is_none());
}

#[test]
fn non_closed_errors_carry_no_reason() {
  assert!(QueueError::NullAction.close_reason().is_none());
  assert!(QueueError::Disconnected.close_reason().is_none());
  assert_eq!(QueueError::NullAction.to_string(), "notify action must be provided");
  assert_eq!(QueueError::Disconnected.to_string(), "queue monitor disconnected");
}
