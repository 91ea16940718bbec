use std::{error::Error, io, sync::Arc};

use super::{CloseReason, TerminalCause};

#[test]
fn attach_ignores_identity_duplicates() {
  let primary: TerminalCause = Arc::new(io::Error::other("boom"));
  let other: TerminalCause = Arc::new(io::Error::other("boom"));
  let mut reason = CloseReason::new(primary.clone());

  reason.attach(primary.clone());
  assert!(reason.suppressed().is_empty());

  // Same message, distinct allocation: identity comparison keeps it.
  reason.attach(other.clone());
  reason.attach(other.clone());
  assert_eq!(reason.suppressed().len(), 1);
  assert!(Arc::ptr_eq(&reason.suppressed()[0], &other));
}

#[test]
fn display_appends_suppressed_count() {
  let mut reason = CloseReason::new(Arc::new(io::Error::other("boom")));
  assert_eq!(reason.to_string(), "boom");

  reason.attach(Arc::new(io::Error::other("later")));
  assert_eq!(reason.to_string(), "boom (+1 suppressed)");
}

#[test]
fn source_exposes_the_primary_cause() {
  let reason = CloseReason::new(Arc::new(io::Error::other("boom")));
  let source = reason.source().unwrap();
  assert_eq!(source.to_string(), "boom");
}
