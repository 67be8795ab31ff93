use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value that can live in a [`NamespacedStore`](crate::NamespacedStore).
///
/// `is_blank` marks values that carry no information (an empty map, say).
/// A blank value read back from disk is replaced by the caller's default.
pub trait StoreValue: Clone + Serialize + DeserializeOwned + Send + Sync {
  fn is_blank(&self) -> bool {
    false
  }
}

impl<K, V> StoreValue for BTreeMap<K, V>
where
  K: Ord + Clone + Serialize + DeserializeOwned + Send + Sync,
  V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
  fn is_blank(&self) -> bool {
    self.is_empty()
  }
}

impl<K, V, S> StoreValue for HashMap<K, V, S>
where
  K: Eq + std::hash::Hash + Clone + Serialize + DeserializeOwned + Send + Sync,
  V: Clone + Serialize + DeserializeOwned + Send + Sync,
  S: std::hash::BuildHasher + Default + Clone + Send + Sync,
{
  fn is_blank(&self) -> bool {
    self.is_empty()
  }
}

impl<T> StoreValue for Vec<T>
where
  T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
  fn is_blank(&self) -> bool {
    self.is_empty()
  }
}

impl<T> StoreValue for Option<T>
where
  T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
  fn is_blank(&self) -> bool {
    self.is_none()
  }
}

impl StoreValue for String {
  fn is_blank(&self) -> bool {
    self.is_empty()
  }
}
