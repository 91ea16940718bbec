use std::{
  fmt,
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
};

use crate::queue::{stream_buffer::StreamBuffer, NotifyAction, QueueError, TerminalCause};


struct QueueMonitor<T> {
  state:   Mutex<StreamBuffer<T>>,
  arrival: Condvar,
}

/// Unbounded, closeable blocking queue with an optional notify action.
///
/// One instance buffers one direction of one logical stream of a multiplexed connection: network
/// I/O completions insert with [`put`](StreamQueue::put) / [`try_put`](StreamQueue::try_put), the
/// application read path drains with [`take`](StreamQueue::take), [`poll`](StreamQueue::poll), or
/// [`poll_all`](StreamQueue::poll_all). A consumer can switch to push-style delivery by registering
/// a [`NotifyAction`] instead of polling.
///
/// Every operation synchronizes on a single internal monitor; only `take` blocks, releasing the
/// lock while it waits and re-checking its predicate on every broadcast wake-up. Clones share the
/// same underlying queue.
pub struct StreamQueue<T> {
  inner: Arc<QueueMonitor<T>>,
}

impl<T> StreamQueue<T> {
  /// Creates an empty, open queue with no notify action registered.
  #[must_use]
  pub fn new() -> Self {
    Self {
      inner: Arc::new(QueueMonitor { state: Mutex::new(StreamBuffer::new()), arrival: Condvar::new() }),
    }
  }

  fn lock(&self) -> Result<MutexGuard<'_, StreamBuffer<T>>, QueueError> {
    self.inner.state.lock().map_err(|_| QueueError::Disconnected)
  }

  /// Lock variant for state accessors and teardown paths, which stay usable after a poisoning
  /// fault elsewhere.
  fn lock_recovering(&self) -> MutexGuard<'_, StreamBuffer<T>> {
    self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Returns the current number of buffered items. Observable at any time, including after close.
  #[must_use]
  pub fn len(&self) -> usize {
    self.lock_recovering().len()
  }

  /// Indicates whether the queue currently buffers no items.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lock_recovering().is_empty()
  }

  /// Indicates whether the queue has been closed.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.lock_recovering().is_closed()
  }

  /// Appends `item` to the tail and wakes every blocked [`take`](StreamQueue::take).
  ///
  /// When notifications are enabled and an action is registered, the action is signalled on this
  /// thread after the lock is released, before `put` returns.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Closed`] when the queue is closed (the item is rejected, not queued),
  /// or [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn put(&self, item: T) -> Result<(), QueueError> {
    let notify = {
      let mut state = self.lock()?;
      if state.is_closed() {
        return Err(state.closed_error());
      }
      state.push_back(item);
      if state.has_waiters() {
        self.inner.arrival.notify_all();
      }
      state.armed_notify()
    };
    if let Some(action) = notify {
      tracing::trace!("signalling notify action after insert");
      action();
    }
    Ok(())
  }

  /// Same as [`put`](StreamQueue::put), but reports a closed queue as `Ok(false)` instead of an
  /// error. Returns `Ok(true)` when the item was queued.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn try_put(&self, item: T) -> Result<bool, QueueError> {
    match self.put(item) {
      | Ok(()) => Ok(true),
      | Err(QueueError::Closed(_)) => Ok(false),
      | Err(other) => Err(other),
    }
  }

  /// Inserts `item` at the head, regardless of closed state.
  ///
  /// This is a correction operation for returning an item that was taken but not fully consumed,
  /// not a new arrival: no waiter is woken and no notify action is signalled.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn pushback(&self, item: T) -> Result<(), QueueError> {
    let mut state = self.lock()?;
    state.push_front(item);
    Ok(())
  }

  /// Inserts a sequence of items at the head, preserving their relative order: the sequence's
  /// first element ends up frontmost. Equivalent to repeated [`pushback`](StreamQueue::pushback)
  /// in reverse order.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn pushback_all<I>(&self, items: I) -> Result<(), QueueError>
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: DoubleEndedIterator, {
    let mut state = self.lock()?;
    for item in items.into_iter().rev() {
      state.push_front(item);
    }
    Ok(())
  }

  /// Removes and returns the front item, blocking while the queue is empty.
  ///
  /// The wait releases the lock and re-checks closed state before emptiness on every wake-up, so a
  /// concurrent [`close`](StreamQueue::close) unblocks every waiter promptly.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Closed`] when the queue is closed, immediately or while waiting, or
  /// [`QueueError::Disconnected`] when the wait cannot complete because the monitor was poisoned.
  /// Waiter accounting is restored on every exit path.
  pub fn take(&self) -> Result<T, QueueError> {
    let mut state = self.lock()?;
    if state.is_closed() {
      return Err(state.closed_error());
    }
    loop {
      if let Some(item) = state.pop_front() {
        return Ok(item);
      }
      state.add_waiter();
      state = match self.inner.arrival.wait(state) {
        | Ok(guard) => guard,
        | Err(poisoned) => {
          let mut guard = poisoned.into_inner();
          guard.remove_waiter();
          return Err(QueueError::Disconnected);
        },
      };
      state.remove_waiter();
      if state.is_closed() {
        return Err(state.closed_error());
      }
    }
  }

  /// Removes and returns the front item, or `Ok(None)` when the queue is empty.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Closed`] when the queue is closed, or [`QueueError::Disconnected`] when
  /// the monitor is poisoned.
  pub fn poll(&self) -> Result<Option<T>, QueueError> {
    let mut state = self.lock()?;
    if state.is_closed() {
      return Err(state.closed_error());
    }
    Ok(state.pop_front())
  }

  /// Atomically drains and returns every buffered item in order, leaving the queue empty.
  ///
  /// Callable regardless of closed state: after observing a close, call this once to salvage any
  /// buffered-but-unread items.
  #[must_use]
  pub fn poll_all(&self) -> Vec<T> {
    self.lock_recovering().drain_all()
  }

  /// Closes the queue and wakes every blocked waiter. Idempotent.
  ///
  /// Buffered items are kept and remain retrievable through [`poll_all`](StreamQueue::poll_all).
  pub fn close(&self) {
    let mut state = self.lock_recovering();
    if state.mark_closed() {
      tracing::debug!(remaining = state.len(), "stream queue closed");
    }
    self.inner.arrival.notify_all();
  }

  /// Records `cause` as the terminal failure, then closes the queue like
  /// [`close`](StreamQueue::close).
  ///
  /// The first recorded cause becomes the primary cause of later [`QueueError::Closed`] errors;
  /// subsequent distinct causes attach as suppressed causes, with duplicates (by `Arc` identity)
  /// ignored. A later plain `close` does not clear the recorded reason.
  pub fn close_exceptionally(&self, cause: TerminalCause) {
    let mut state = self.lock_recovering();
    state.record_failure(cause);
    if state.mark_closed() {
      if let Some(reason) = state.close_reason() {
        tracing::debug!(remaining = state.len(), cause = %reason, "stream queue closed exceptionally");
      }
    }
    self.inner.arrival.notify_all();
  }

  /// Registers `action` as the notify action, replacing any previous registration.
  ///
  /// If the queue is already non-empty, the new action is signalled once as a catch-up, so
  /// push-style consumers never miss already-arrived items; nothing is consumed by the catch-up
  /// itself. The catch-up fires even while notifications are disabled, matching insert-time
  /// delivery only in being deferred until after the lock is released.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::NullAction`] when `action` is `None`, or [`QueueError::Disconnected`]
  /// when the monitor is poisoned.
  pub fn register_notify_action(&self, action: Option<NotifyAction>) -> Result<(), QueueError> {
    let Some(action) = action else {
      return Err(QueueError::NullAction);
    };
    let catch_up = {
      let mut state = self.lock()?;
      state.set_notify_action(action.clone());
      !state.is_empty()
    };
    if catch_up {
      tracing::trace!("signalling catch-up notify action");
      action();
    }
    Ok(())
  }

  /// Suppresses notify signals on subsequent inserts. The registered action is kept.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn disable_notify(&self) -> Result<(), QueueError> {
    let mut state = self.lock()?;
    state.set_notify_disabled(true);
    Ok(())
  }

  /// Clears the suppression, then drains by notification: the registered action is signalled once
  /// per buffered item, stopping early when the queue empties.
  ///
  /// The number of signals is bounded by the length observed at entry, so an action that consumes
  /// nothing cannot spin this loop forever; items inserted concurrently are announced by their own
  /// inserts. With no action registered, only the suppression is cleared.
  ///
  /// # Errors
  ///
  /// Returns [`QueueError::Disconnected`] when the monitor is poisoned.
  pub fn enable_notify(&self) -> Result<(), QueueError> {
    let rounds = {
      let mut state = self.lock()?;
      state.set_notify_disabled(false);
      state.len()
    };
    for _ in 0..rounds {
      let action = {
        let state = self.lock()?;
        if state.is_empty() {
          break;
        }
        state.notify_action()
      };
      match action {
        | Some(action) => action(),
        | None => break,
      }
    }
    Ok(())
  }
}

impl<T> Clone for StreamQueue<T> {
  fn clone(&self) -> Self {
    Self { inner: Arc::clone(&self.inner) }
  }
}

impl<T> Default for StreamQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for StreamQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StreamQueue").finish()
  }
}
