use livery_store::StoreError;
use thiserror::Error;

/// The main error type for `livery_engine`.
#[derive(Debug, Error)]
pub enum Error {
  #[error("outfit cache unavailable: {0}")]
  Store(#[from] StoreError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Build(#[from] BuildError),
}

/// A specialized `Result` type for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why the host refused to commit an outfit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplyError {
  #[error("server rejected the request: {0}")]
  Rejected(String),

  #[error("not enough items in the inventory")]
  InsufficientItems,

  #[error("apply service unavailable")]
  Unavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("configuration file not found: {0}")]
  NotFound(String),

  #[error("failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("failed to parse configuration: {0}")]
  Parse(String),

  #[error("invalid configuration value for '{field}': {message}")]
  InvalidValue { field: String, message: String },
}

/// Errors that can occur when assembling a [`Swapper`](crate::Swapper).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  #[error("no {0} was provided")]
  Missing(&'static str),
}
