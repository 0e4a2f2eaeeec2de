use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Error, Tolerance};

/// Cooperative cancellation flag shared between a caller and a running hull
/// computation.
///
/// Builders poll the token at loop boundaries and return
/// [`Error::Cancelled`] once it is set. The engine owns no external resources
/// so abandoning a computation this way is always safe.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> CancelToken {
    CancelToken::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }
}

/// Per-call knobs shared by both builders.
#[derive(Debug, Clone, Default)]
pub struct HullOptions {
  pub tolerance: Tolerance,
  pub cancel: Option<CancelToken>,
}

impl HullOptions {
  pub fn new() -> HullOptions {
    HullOptions::default()
  }

  #[must_use]
  pub fn with_tolerance(mut self, tolerance: Tolerance) -> HullOptions {
    self.tolerance = tolerance;
    self
  }

  #[must_use]
  pub fn with_cancel(mut self, token: CancelToken) -> HullOptions {
    self.cancel = Some(token);
    self
  }

  pub(crate) fn checkpoint(&self) -> Result<(), Error> {
    match &self.cancel {
      Some(token) if token.is_cancelled() => Err(Error::Cancelled),
      _ => Ok(()),
    }
  }
}

// Number of loop iterations between two cancellation checks.
pub(crate) const CHECKPOINT_INTERVAL: usize = 1024;
