use std::{future::Future, pin::Pin};

/// Runs the swapper's event dispatcher and handlers.
///
/// Implement this to drive the swapper from a runtime other than Tokio.
pub trait TaskSpawner: Send + Sync + 'static {
  fn spawn(&self, task: Pin<Box<dyn Future<Output = ()> + Send>>);
}

/// A [`TaskSpawner`] backed by a Tokio runtime handle.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioSpawner {
  handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioSpawner {
  /// Spawns onto the runtime this is called from.
  /// Panics outside of a Tokio runtime.
  pub fn current() -> Self {
    Self {
      handle: tokio::runtime::Handle::current(),
    }
  }

  pub fn from_handle(handle: tokio::runtime::Handle) -> Self {
    Self { handle }
  }
}

#[cfg(feature = "tokio")]
impl TaskSpawner for TokioSpawner {
  fn spawn(&self, task: Pin<Box<dyn Future<Output = ()> + Send>>) {
    drop(self.handle.spawn(task));
  }
}
