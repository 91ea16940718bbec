use std::collections::VecDeque;

use crate::queue::{CloseReason, NotifyAction, QueueError, TerminalCause};

#[cfg(test)]
mod tests;

/// Unsynchronized queue state; every field is mutated only under the owning monitor's lock.
pub(crate) struct StreamBuffer<T> {
  items:           VecDeque<T>,
  closed:          bool,
  close_reason:    Option<CloseReason>,
  waiters:         usize,
  notify_action:   Option<NotifyAction>,
  notify_disabled: bool,
}

impl<T> StreamBuffer<T> {
  pub(crate) const fn new() -> Self {
    Self {
      items:           VecDeque::new(),
      closed:          false,
      close_reason:    None,
      waiters:         0,
      notify_action:   None,
      notify_disabled: false,
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.items.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub(crate) const fn is_closed(&self) -> bool {
    self.closed
  }

  pub(crate) fn push_back(&mut self, item: T) {
    self.items.push_back(item);
  }

  pub(crate) fn push_front(&mut self, item: T) {
    self.items.push_front(item);
  }

  pub(crate) fn pop_front(&mut self) -> Option<T> {
    self.items.pop_front()
  }

  pub(crate) fn drain_all(&mut self) -> Vec<T> {
    self.items.drain(..).collect()
  }

  /// Marks the buffer closed; returns whether this call performed the transition.
  pub(crate) fn mark_closed(&mut self) -> bool {
    let transitioned = !self.closed;
    self.closed = true;
    transitioned
  }

  /// Records a terminal cause: the first becomes primary, later distinct ones attach as suppressed.
  pub(crate) fn record_failure(&mut self, cause: TerminalCause) {
    match &mut self.close_reason {
      | Some(reason) => reason.attach(cause),
      | None => self.close_reason = Some(CloseReason::new(cause)),
    }
  }

  pub(crate) const fn close_reason(&self) -> Option<&CloseReason> {
    self.close_reason.as_ref()
  }

  /// Builds the closed error carrying a snapshot of the recorded reason, if any.
  pub(crate) fn closed_error(&self) -> QueueError {
    QueueError::Closed(self.close_reason.clone())
  }

  pub(crate) const fn has_waiters(&self) -> bool {
    self.waiters > 0
  }

  pub(crate) fn add_waiter(&mut self) {
    self.waiters += 1;
  }

  pub(crate) fn remove_waiter(&mut self) {
    self.waiters = self.waiters.saturating_sub(1);
  }

  pub(crate) fn set_notify_action(&mut self, action: NotifyAction) {
    self.notify_action = Some(action);
  }

  pub(crate) fn notify_action(&self) -> Option<NotifyAction> {
    self.notify_action.clone()
  }

  pub(crate) fn set_notify_disabled(&mut self, disabled: bool) {
    self.notify_disabled = disabled;
  }

  /// Returns the action to signal after an insert: registered, enabled, and items observable.
  pub(crate) fn armed_notify(&self) -> Option<NotifyAction> {
    if self.notify_disabled || self.items.is_empty() {
      return None;
    }
    self.notify_action.clone()
  }
}
