use std::{io, sync::Arc};

use super::StreamBuffer;
use crate::queue::{NotifyAction, TerminalCause};

fn noop_action() -> NotifyAction {
  Arc::new(|| {})
}

#[test]
fn mark_closed_reports_the_transition_once() {
  let mut buffer: StreamBuffer<u32> = StreamBuffer::new();
  assert!(!buffer.is_closed());
  assert!(buffer.mark_closed());
  assert!(!buffer.mark_closed());
  assert!(buffer.is_closed());
}

#[test]
fn record_failure_sets_primary_then_suppresses() {
  let mut buffer: StreamBuffer<u32> = StreamBuffer::new();
  let first: TerminalCause = Arc::new(io::Error::other("first"));
  let second: TerminalCause = Arc::new(io::Error::other("second"));

  buffer.record_failure(first.clone());
  buffer.record_failure(second.clone());
  buffer.record_failure(first.clone());

  let reason = buffer.close_reason().unwrap();
  assert!(Arc::ptr_eq(reason.primary(), &first));
  assert_eq!(reason.suppressed().len(), 1);
  assert!(Arc::ptr_eq(&reason.suppressed()[0], &second));
}

#[test]
fn closed_error_snapshots_the_recorded_reason() {
  let mut buffer: StreamBuffer<u32> = StreamBuffer::new();
  assert!(buffer.closed_error().close_reason().is_none());

  buffer.record_failure(Arc::new(io::Error::other("fault")));
  assert!(buffer.closed_error().close_reason().is_some());
}

#[test]
fn armed_notify_requires_enabled_registered_and_non_empty() {
  let mut buffer: StreamBuffer<u32> = StreamBuffer::new();
  assert!(buffer.armed_notify().is_none());

  buffer.push_back(1);
  assert!(buffer.armed_notify().is_none());

  buffer.set_notify_action(noop_action());
  assert!(buffer.armed_notify().is_some());

  buffer.set_notify_disabled(true);
  assert!(buffer.armed_notify().is_none());

  buffer.set_notify_disabled(false);
  let _ = buffer.pop_front();
  assert!(buffer.armed_notify().is_none());
}

#[test]
fn waiter_count_never_underflows() {
  let mut buffer: StreamBuffer<u32> = StreamBuffer::new();
  buffer.remove_waiter();
  assert!(!buffer.has_waiters());

  buffer.add_waiter();
  assert!(buffer.has_waiters());
  buffer.remove_waiter();
  buffer.remove_waiter();
  assert!(!buffer.has_waiters());
}

#[test]
fn drain_all_empties_in_order() {
  let mut buffer = StreamBuffer::new();
  buffer.push_back('a');
  buffer.push_back('b');
  buffer.push_front('x');

  assert_eq!(buffer.drain_all(), vec!['x', 'a', 'b']);
  assert!(buffer.is_empty());
  assert_eq!(buffer.len(), 0);
}
