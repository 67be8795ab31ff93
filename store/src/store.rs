use crate::envelope::{Envelope, EnvelopeHeader, PAYLOAD_VERSION};
use crate::error::{Result, StoreError};
use crate::value::StoreValue;

use core::fmt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

/// A disk-backed store holding one value per namespace.
///
/// Each namespace is mirrored in memory once it has been read or written, and
/// the mirror is authoritative from then on. Every `set` is written through to
/// the namespace's file right away.
///
/// Values cross the store boundary by value: `get` hands out a clone and `set`
/// takes ownership, so nothing a caller does with a value can reach the
/// mirrored copy.
pub struct NamespacedStore<V> {
  dir: PathBuf,
  base_file_name: String,
  mirror: RwLock<HashMap<Option<String>, V>>,
  // Serializes writers across all namespaces. Writes are rare and short.
  write_lock: Mutex<()>,
}

impl<V> fmt::Debug for NamespacedStore<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NamespacedStore")
      .field("dir", &self.dir)
      .field("base_file_name", &self.base_file_name)
      .field("mirrored_namespaces", &self.mirror.read().len())
      .finish()
  }
}

impl<V: StoreValue> NamespacedStore<V> {
  /// Opens a store rooted at `dir`, creating the directory if needed.
  pub fn open(dir: impl Into<PathBuf>, base_file_name: impl Into<String>) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

    Ok(Self {
      dir,
      base_file_name: base_file_name.into(),
      mirror: RwLock::new(HashMap::new()),
      write_lock: Mutex::new(()),
    })
  }

  /// Opens a store in an application-private directory named `app_dir_name`
  /// under the platform's local data directory.
  pub fn in_app_dir(app_dir_name: &str, base_file_name: impl Into<String>) -> Result<Self> {
    let root = dirs::data_local_dir().ok_or(StoreError::NoAppDir)?;
    Self::open(root.join(app_dir_name), base_file_name)
  }

  /// The directory holding the namespace files.
  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// The backing file for `namespace`.
  ///
  /// `None` maps to the bare base file name, `Some(ns)` to `"{ns}.{base}"`.
  pub fn path_for(&self, namespace: Option<&str>) -> PathBuf {
    match namespace {
      Some(ns) => self.dir.join(format!("{}.{}", ns, self.base_file_name)),
      None => self.dir.join(&self.base_file_name),
    }
  }

  /// Returns `true` if `namespace` has a value in memory or on disk.
  pub fn contains(&self, namespace: Option<&str>) -> bool {
    let key = namespace.map(str::to_owned);
    self.mirror.read().contains_key(&key) || self.path_for(namespace).is_file()
  }

  /// Returns a copy of the value stored under `namespace`.
  ///
  /// The first read of a namespace loads its file into memory. When neither
  /// memory nor disk hold anything, `default` is returned and nothing is
  /// recorded. A blank value is also answered with `default`.
  pub fn get(&self, namespace: Option<&str>, default: V) -> Result<V> {
    let key = namespace.map(str::to_owned);

    if let Some(value) = self.mirror.read().get(&key) {
      return Ok(if value.is_blank() { default } else { value.clone() });
    }

    let path = self.path_for(namespace);
    if !path.is_file() {
      return Ok(default);
    }

    let value = Self::read_file(&path)?;
    tracing::debug!(namespace = ?namespace, path = ?path, "loaded namespace from disk");

    // A `set` that landed while the file was being read owns the entry.
    let mut mirror = self.mirror.write();
    let value = mirror.entry(key).or_insert(value);
    Ok(if value.is_blank() { default } else { value.clone() })
  }

  /// Replaces the value stored under `namespace` and writes it to disk.
  ///
  /// The memory mirror only changes once the file has been written, so a
  /// failed write leaves both in their previous state.
  pub fn set(&self, value: V, namespace: Option<&str>) -> Result<()> {
    let _guard = self.write_lock.lock();

    let path = self.path_for(namespace);
    let bytes =
      serde_json::to_vec_pretty(&Envelope::current(&value)).map_err(StoreError::Encode)?;
    Self::write_file(&path, &bytes)?;

    self.mirror.write().insert(namespace.map(str::to_owned), value);
    tracing::debug!(namespace = ?namespace, path = ?path, bytes = bytes.len(), "namespace written");
    Ok(())
  }

  fn read_file(path: &Path) -> Result<V> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;

    let header: EnvelopeHeader =
      serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
      })?;
    if header.version > PAYLOAD_VERSION {
      return Err(StoreError::UnsupportedVersion {
        path: path.to_path_buf(),
        found: header.version,
        supported: PAYLOAD_VERSION,
      });
    }

    let envelope: Envelope<V> =
      serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
      })?;
    Ok(envelope.entries)
  }

  // Write to a sibling file first so a reader never sees half a payload.
  fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, bytes).map_err(|e| StoreError::io(&staging, e))?;
    fs::rename(&staging, path).map_err(|e| StoreError::io(path, e))
  }
}
