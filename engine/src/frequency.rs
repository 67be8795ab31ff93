use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

/// Counts how often each key has been selected during this process.
///
/// Counts start at zero, only ever grow, and are never persisted. The tracker
/// turns them into an eviction order: least-frequently selected first.
#[derive(Debug)]
pub struct FrequencyTracker<K> {
  counts: Mutex<HashMap<K, u64>>,
}

impl<K> Default for FrequencyTracker<K> {
  fn default() -> Self {
    Self {
      counts: Mutex::new(HashMap::new()),
    }
  }
}

impl<K> FrequencyTracker<K>
where
  K: Eq + Hash + Clone,
{
  pub fn new() -> Self {
    Self::default()
  }

  /// Records one selection of `key`.
  pub fn select(&self, key: &K) {
    *self.counts.lock().entry(key.clone()).or_insert(0) += 1;
  }

  /// The number of times `key` was selected.
  pub fn frequency(&self, key: &K) -> u64 {
    self.counts.lock().get(key).copied().unwrap_or(0)
  }

  /// Sorts `items` by ascending frequency of `key_fn(item)`.
  ///
  /// The sort is stable: items with equal counts keep their input order.
  pub fn sort_least_frequent<T, F>(&self, mut items: Vec<T>, key_fn: F) -> Vec<T>
  where
    F: Fn(&T) -> K,
  {
    let counts = self.counts.lock();
    items.sort_by_cached_key(|item| counts.get(&key_fn(item)).copied().unwrap_or(0));
    items
  }

  /// Sorts `items` by descending frequency of `key_fn(item)`, stably.
  pub fn sort_most_frequent<T, F>(&self, mut items: Vec<T>, key_fn: F) -> Vec<T>
  where
    F: Fn(&T) -> K,
  {
    let counts = self.counts.lock();
    items.sort_by_cached_key(|item| Reverse(counts.get(&key_fn(item)).copied().unwrap_or(0)));
    items
  }

  /// [`sort_least_frequent`](Self::sort_least_frequent) for bare keys.
  pub fn sort_keys_least_frequent(&self, keys: Vec<K>) -> Vec<K> {
    self.sort_least_frequent(keys, K::clone)
  }
}
