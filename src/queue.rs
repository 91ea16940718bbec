mod close_reason;
mod notify_action;
mod queue_error;
mod stream_buffer;
mod stream_queue;

pub use close_reason::{CloseReason, TerminalCause};
pub use notify_action::NotifyAction;
pub use queue_error::QueueError;
pub use stream_queue::StreamQueue;
