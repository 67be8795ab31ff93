use std::sync::atomic::{AtomicBool, Ordering};

/// Lets at most one run of an operation be in flight.
///
/// A second caller does not wait: [`try_enter`](Self::try_enter) returns
/// `None` and the caller drops its run.
#[derive(Debug, Default)]
pub struct RunGuard {
  running: AtomicBool,
}

impl RunGuard {
  pub fn new() -> Self {
    Self::default()
  }

  /// Claims the guard, or returns `None` if a run is already in flight.
  ///
  /// The claim is released when the returned token is dropped, including
  /// on early return, on error and on unwinding.
  pub fn try_enter(&self) -> Option<RunToken<'_>> {
    self
      .running
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| RunToken { guard: self })
  }

  pub fn is_running(&self) -> bool {
    self.running.load(Ordering::Acquire)
  }
}

/// Proof of a claimed [`RunGuard`]. Dropping it ends the run.
#[derive(Debug)]
#[must_use = "the run ends as soon as the token is dropped"]
pub struct RunToken<'a> {
  guard: &'a RunGuard,
}

impl Drop for RunToken<'_> {
  fn drop(&mut self) {
    self.guard.running.store(false, Ordering::Release);
  }
}
