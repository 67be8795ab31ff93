//! The interfaces this crate consumes from the host client.
//!
//! The host owns the inventory, the session and the message surface; the
//! engine only reads from them and asks the [`Applier`] to commit changes.

use crate::error::ApplyError;
use crate::model::{
  Configuration, Descriptor, ItemId, Outfit, ResolvedConfiguration, Season, StockItem, VehicleId,
  VehicleInfo,
};

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// Read access to the player's garage and the item catalog.
pub trait Catalog: Send + Sync {
  /// Every vehicle the player owns.
  fn owned_vehicles(&self) -> Vec<VehicleInfo>;

  /// Items usable on `vehicle`, with their full inventory count for it.
  fn compatible_items(&self, vehicle: VehicleId) -> HashMap<ItemId, StockItem>;

  /// The outfit currently mounted on `vehicle` for `season`, if any.
  fn current_outfit(&self, vehicle: VehicleId, season: Season) -> Option<Outfit>;

  /// The descriptor a style overlay would produce for `vehicle` in `season`.
  fn styled_descriptor(&self, vehicle: VehicleId, season: Season) -> Option<Descriptor>;

  /// Expands a descriptor into the items it mounts.
  fn resolve(&self, descriptor: &Descriptor) -> Outfit;

  fn vehicle(&self, id: VehicleId) -> Option<VehicleInfo> {
    self.owned_vehicles().into_iter().find(|v| v.id == id)
  }
}

/// One request to commit an outfit to a vehicle's season. `None` demounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRequest {
  pub vehicle: VehicleId,
  pub season: Season,
  pub outfit: Option<Outfit>,
}

impl ApplyRequest {
  pub fn demount(vehicle: VehicleId, season: Season) -> Self {
    Self {
      vehicle,
      season,
      outfit: None,
    }
  }

  pub fn is_demount(&self) -> bool {
    self.outfit.is_none()
  }
}

/// Commits outfit changes. Completion is asynchronous and may fail.
#[async_trait]
pub trait Applier: Send + Sync {
  async fn apply(&self, request: ApplyRequest) -> Result<(), ApplyError>;
}

/// What the engine needs to know about the running client.
pub trait Session: Send + Sync {
  /// The player's display name, or `None` when no player is logged in.
  fn player_name(&self) -> Option<String>;
  fn realm(&self) -> String;
  fn is_tutorial(&self) -> bool;
  /// `true` while a replay is loading or playing.
  fn is_replay(&self) -> bool;
  /// The vehicle currently selected in the garage.
  fn current_vehicle(&self) -> Option<VehicleId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Information,
  Warning,
}

/// Where user-facing messages go.
pub trait Notifier: Send + Sync {
  fn push_message(&self, text: &str, severity: Severity);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReason {
  /// The client changed something itself (an equip, a purchase, a battle result).
  ClientUpdate,
  /// A full resync requested by the server.
  ServerResync,
  Other,
}

/// A completed inventory synchronization, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySync {
  pub reason: SyncReason,
  /// Vehicles that changed, or `None` when the sync did not touch vehicles.
  pub vehicles: Option<BTreeSet<VehicleId>>,
  /// Whether any outfit was part of the change.
  pub outfits_changed: bool,
}

/// Resolves the cache namespace for the current player and realm.
///
/// Replays have no inventory of their own, so they map to `None`.
pub fn cache_namespace(session: &dyn Session) -> Option<String> {
  if session.is_replay() {
    return None;
  }
  session
    .player_name()
    .map(|name| format!("{}@{}", name, session.realm()))
}

/// Seasons of `vehicle` that carry a user-applied outfit.
///
/// A season whose outfit is exactly the style overlay does not count.
pub fn applied_outfits(catalog: &dyn Catalog, vehicle: VehicleId) -> ResolvedConfiguration {
  Season::ALL
    .into_iter()
    .filter_map(|season| {
      let outfit = catalog.current_outfit(vehicle, season)?;
      let styled = catalog.styled_descriptor(vehicle, season);
      if styled.as_ref() == Some(&outfit.descriptor) {
        return None;
      }
      Some((season, outfit))
    })
    .collect()
}

/// Descriptors of [`applied_outfits`].
pub fn applied_descriptors(catalog: &dyn Catalog, vehicle: VehicleId) -> Configuration {
  crate::model::descriptors_of(&applied_outfits(catalog, vehicle))
}

/// Resolves every descriptor of a configuration.
pub fn resolve_all(catalog: &dyn Catalog, configuration: &Configuration) -> ResolvedConfiguration {
  configuration
    .iter()
    .map(|(season, descriptor)| (*season, catalog.resolve(descriptor)))
    .collect()
}
