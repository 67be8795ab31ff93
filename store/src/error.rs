use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a namespace's backing file.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("I/O failure on {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to decode {path:?}: {source}")]
  Decode {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to encode cache payload: {0}")]
  Encode(#[source] serde_json::Error),

  #[error("{path:?} was written with payload version {found}, this build reads up to {supported}")]
  UnsupportedVersion {
    path: PathBuf,
    found: u32,
    supported: u32,
  },

  #[error("the platform exposes no local data directory")]
  NoAppDir,
}

impl StoreError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    StoreError::Io {
      path: path.into(),
      source,
    }
  }
}

/// A specialized `Result` type for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
