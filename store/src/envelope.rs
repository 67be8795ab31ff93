use serde::{Deserialize, Serialize};

/// The payload version written by this build.
pub const PAYLOAD_VERSION: u32 = 1;

/// The on-disk wrapper around a namespace's value.
///
/// The version lets a future build refuse (or migrate) files it does not
/// understand instead of misreading them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Envelope<V> {
  pub(crate) version: u32,
  pub(crate) entries: V,
}

impl<V> Envelope<V> {
  pub(crate) fn current(entries: V) -> Self {
    Self {
      version: PAYLOAD_VERSION,
      entries,
    }
  }
}

/// Only the header, so an unsupported version is reported before the
/// entries are parsed against a layout they may not follow.
#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeHeader {
  pub(crate) version: u32,
}
