use std::sync::Arc;

/// Zero-argument action signalled when new items become observable.
///
/// Actions run synchronously on the thread performing the triggering operation (insert,
/// registration catch-up, or re-enable drain), after the queue's internal lock has been released.
/// An action may therefore call back into the same queue without deadlocking.
pub type NotifyAction = Arc<dyn Fn() + Send + Sync>;
