//! A small, namespaced persistent store.
//!
//! Each namespace (for example a player and realm pair) owns one file in a
//! private directory plus an in-memory mirror that is loaded lazily on first
//! read and updated on every write.
//!
//! # Features
//! - **Copy-on-read**: values are cloned on the way out, so callers can mutate
//!   what they get back without touching the stored state.
//! - **Write-through**: `set` writes the namespace file before returning.
//! - **Serialized writers**: one lock per store guards every file write.
//! - **Versioned payloads**: files carry a format version and newer versions
//!   are refused instead of misread.
//!
//! ```no_run
//! use livery_store::NamespacedStore;
//! use std::collections::BTreeMap;
//!
//! let store: NamespacedStore<BTreeMap<u32, String>> =
//!   NamespacedStore::open("/tmp/livery", "outfits.json").unwrap();
//!
//! let mut map = store.get(Some("player@eu"), BTreeMap::new()).unwrap();
//! map.insert(7, "camo".to_string());
//! store.set(map, Some("player@eu")).unwrap();
//! ```

pub mod error;
mod envelope;
mod store;
mod value;

pub use envelope::PAYLOAD_VERSION;
pub use error::{Result, StoreError};
pub use store::NamespacedStore;
pub use value::StoreValue;
