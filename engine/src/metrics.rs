use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// Thread-safe counters for the swapper. All fields are atomic.
#[derive(Debug)]
pub struct Metrics {
  // --- Runs ---
  pub(crate) swaps_started: CachePadded<AtomicU64>,
  pub(crate) swaps_skipped: CachePadded<AtomicU64>,
  pub(crate) reclaims_skipped: CachePadded<AtomicU64>,

  // --- Requests sent to the applier ---
  pub(crate) demounts_issued: CachePadded<AtomicU64>,
  pub(crate) applies_issued: CachePadded<AtomicU64>,
  pub(crate) apply_failures: CachePadded<AtomicU64>,

  pub(crate) cache_writes: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      swaps_started: CachePadded::new(AtomicU64::new(0)),
      swaps_skipped: CachePadded::new(AtomicU64::new(0)),
      reclaims_skipped: CachePadded::new(AtomicU64::new(0)),
      demounts_issued: CachePadded::new(AtomicU64::new(0)),
      applies_issued: CachePadded::new(AtomicU64::new(0)),
      apply_failures: CachePadded::new(AtomicU64::new(0)),
      cache_writes: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
  }

  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    MetricsSnapshot {
      swaps_started: self.swaps_started.load(Ordering::Relaxed),
      swaps_skipped: self.swaps_skipped.load(Ordering::Relaxed),
      reclaims_skipped: self.reclaims_skipped.load(Ordering::Relaxed),
      demounts_issued: self.demounts_issued.load(Ordering::Relaxed),
      applies_issued: self.applies_issued.load(Ordering::Relaxed),
      apply_failures: self.apply_failures.load(Ordering::Relaxed),
      cache_writes: self.cache_writes.load(Ordering::Relaxed),
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time copy of the swapper's counters.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
  /// Swap runs that got past the concurrency guard.
  pub swaps_started: u64,
  /// Swap runs dropped because another one was in flight.
  pub swaps_skipped: u64,
  /// Season reclaims dropped because another one was in flight.
  pub reclaims_skipped: u64,
  /// Demount requests sent to the applier.
  pub demounts_issued: u64,
  /// Outfit apply requests sent to the applier.
  pub applies_issued: u64,
  /// Requests the applier reported as failed.
  pub apply_failures: u64,
  /// Writes to the outfit cache.
  pub cache_writes: u64,
  pub uptime_secs: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("swaps_started", &self.swaps_started)
      .field("swaps_skipped", &self.swaps_skipped)
      .field("reclaims_skipped", &self.reclaims_skipped)
      .field("demounts_issued", &self.demounts_issued)
      .field("applies_issued", &self.applies_issued)
      .field("apply_failures", &self.apply_failures)
      .field("cache_writes", &self.cache_writes)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
