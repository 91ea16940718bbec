use thiserror::Error;

use crate::queue::CloseReason;

#[cfg(test)]
mod tests;

/// Errors surfaced by [`StreamQueue`](crate::queue::StreamQueue) operations.
#[derive(Clone, Debug, Error)]
pub enum QueueError {
  /// The queue has been closed; inserts and pull-style removals are rejected.
  ///
  /// Carries a snapshot of the recorded [`CloseReason`] when the close was exceptional.
  #[error("stream queue closed")]
  Closed(#[source] Option<CloseReason>),
  /// No notify action was provided at registration.
  #[error("notify action must be provided")]
  NullAction,
  /// The monitor was poisoned while an operation held or awaited the lock.
  #[error("queue monitor disconnected")]
  Disconnected,
}

impl QueueError {
  /// Returns the recorded close reason, if this is a closed error carrying one.
  #[must_use]
  pub const fn close_reason(&self) -> Option<&CloseReason> {
    match self {
      | QueueError::Closed(reason) => reason.as_ref(),
      | _ => None,
    }
  }
}
