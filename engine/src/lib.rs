//! Keeps a remembered cosmetic outfit on every vehicle, even though the
//! cosmetic items themselves are shared and finite across the garage.
//!
//! Whenever a vehicle becomes active, the [`Swapper`] looks up the outfit the
//! player last chose for it, and if that outfit is not on the vehicle any
//! more it applies it again. When the shared inventory is short, the
//! [`ReclaimEngine`] strips the outfits of the least frequently used vehicles
//! first until the request fits.
//!
//! # Pieces
//! - [`NamespacedStore`](livery_store::NamespacedStore) holds the desired
//!   outfit of every vehicle, one file per player and realm.
//! - [`FrequencyTracker`] counts vehicle selections and orders eviction.
//! - [`ReclaimEngine`] plans demounts against an inventory snapshot.
//! - [`Swapper`] runs the workflow behind a non-re-entrant guard and reports
//!   the result to the player.
//!
//! The host client is reached only through the traits in [`host`].

pub mod builder;
pub mod config;
#[cfg(feature = "tokio")]
pub mod dispatch;
pub mod error;
pub mod frequency;
pub mod guard;
pub mod host;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod reclaim;
pub mod runtime;
pub mod swapper;

pub use builder::SwapperBuilder;
pub use config::{find_config_file, EngineConfig, MessageTemplates};
#[cfg(feature = "tokio")]
pub use dispatch::{EventSender, HostEvent, Subscription};
pub use error::{ApplyError, BuildError, ConfigError, Error, Result};
pub use frequency::FrequencyTracker;
pub use host::{Applier, ApplyRequest, Catalog, InventorySync, Notifier, Session, Severity, SyncReason};
pub use metrics::MetricsSnapshot;
pub use model::{
  CacheMap, Configuration, Descriptor, Item, ItemId, ItemKind, Outfit, ResolvedConfiguration,
  Season, SeasonSet, StockItem, VehicleId, VehicleInfo,
};
pub use policy::RequiredCounts;
pub use reclaim::{Demount, ReclaimEngine, ReclaimPlan, ReclaimTarget};
#[cfg(feature = "tokio")]
pub use runtime::TokioSpawner;
pub use runtime::TaskSpawner;
pub use swapper::{AbortReason, ReclaimOutcome, SwapOutcome, SwapTrigger, Swapper, SyncOutcome};
