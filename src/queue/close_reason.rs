use std::{error::Error, fmt, sync::Arc};

#[cfg(test)]
mod tests;

/// Type-erased failure recorded against a queue when it is closed exceptionally.
pub type TerminalCause = Arc<dyn Error + Send + Sync>;

/// Aggregated reason a queue was closed exceptionally.
///
/// The first recorded cause becomes the primary cause and is never replaced. Causes recorded
/// afterwards are kept in attachment order as suppressed causes, so failure information from
/// independent sources (for example a read-side and a write-side fault) is not dropped. Duplicate
/// attachments of the same cause are detected by `Arc` identity, not value equality, and ignored.
#[derive(Clone, Debug)]
pub struct CloseReason {
  primary:    TerminalCause,
  suppressed: Vec<TerminalCause>,
}

impl CloseReason {
  pub(crate) const fn new(primary: TerminalCause) -> Self {
    Self { primary, suppressed: Vec::new() }
  }

  pub(crate) fn attach(&mut self, cause: TerminalCause) {
    if Arc::ptr_eq(&self.primary, &cause) {
      return;
    }
    if self.suppressed.iter().any(|existing| Arc::ptr_eq(existing, &cause)) {
      return;
    }
    self.suppressed.push(cause);
  }

  /// Returns the first recorded cause.
  #[must_use]
  pub const fn primary(&self) -> &TerminalCause {
    &self.primary
  }

  /// Returns the suppressed causes in attachment order.
  #[must_use]
  pub fn suppressed(&self) -> &[TerminalCause] {
    &self.suppressed
  }
}

impl fmt::Display for CloseReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.suppressed.is_empty() {
      write!(f, "{}", self.primary)
    } else {
      write!(f, "{} (+{} suppressed)", self.primary, self.suppressed.len())
    }
  }
}

impl Error for CloseReason {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    let primary: &(dyn Error + 'static) = self.primary.as_ref();
    Some(primary)
  }
}
