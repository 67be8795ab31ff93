//! Decides which vehicles to strip so the active vehicle's request fits in
//! the shared inventory.
//!
//! The pass is greedy and vehicle-granular. Candidates are visited from the
//! least to the most frequently selected vehicle; any candidate holding an
//! item the request is short of is flagged for a full demount, and its copies
//! are credited back before the next candidate is examined. Availability only
//! grows during the pass, so one left-to-right sweep is enough.

use crate::frequency::FrequencyTracker;
use crate::host::{applied_outfits, ApplyRequest, Catalog};
use crate::model::{ItemId, ResolvedConfiguration, Season, VehicleId};
use crate::policy::RequiredCounts;

use std::collections::HashMap;

/// What the active vehicle is about to need.
#[derive(Debug, Clone, Copy)]
pub enum ReclaimTarget<'a> {
  /// A concrete configuration is about to be applied.
  Configuration(&'a ResolvedConfiguration),
  /// The player is about to edit `Season` by hand; assume the worst case.
  Season(Season),
}

impl<'a> ReclaimTarget<'a> {
  fn configuration(&self) -> Option<&'a ResolvedConfiguration> {
    match *self {
      ReclaimTarget::Configuration(outfits) => Some(outfits),
      ReclaimTarget::Season(_) => None,
    }
  }

  // Seasons of the active vehicle whose mounted items count as supply.
  fn credits_season(&self, season: Season) -> bool {
    match self {
      ReclaimTarget::Configuration(_) => true,
      ReclaimTarget::Season(target) => *target == season,
    }
  }
}

/// Clear one vehicle's outfit for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demount {
  pub vehicle: VehicleId,
  pub season: Season,
}

/// The outcome of a reclaim pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimPlan {
  /// Demounts in eviction order, then season order.
  pub demounts: Vec<Demount>,
  /// Vehicles that lose their outfit, in eviction order.
  pub flagged: Vec<VehicleId>,
}

impl ReclaimPlan {
  pub fn is_empty(&self) -> bool {
    self.demounts.is_empty()
  }

  pub fn requests(&self) -> Vec<ApplyRequest> {
    self
      .demounts
      .iter()
      .map(|d| ApplyRequest::demount(d.vehicle, d.season))
      .collect()
  }
}

/// Remaining usable copies per item, rebuilt for every pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct InventorySnapshot {
  available: HashMap<ItemId, u32>,
}

impl InventorySnapshot {
  /// Returns a copy to the pool. Items the active vehicle cannot use stay unknown.
  fn credit(&mut self, id: ItemId) {
    if let Some(available) = self.available.get_mut(&id) {
      *available += 1;
    }
  }

  /// `None` for items the active vehicle cannot use at all.
  fn available(&self, id: ItemId) -> Option<u32> {
    self.available.get(&id).copied()
  }
}

/// Plans the demounts needed to satisfy a request on the active vehicle.
#[derive(Debug, Clone, Default)]
pub struct ReclaimEngine {
  counts: RequiredCounts,
}

impl ReclaimEngine {
  pub fn new(counts: RequiredCounts) -> Self {
    Self { counts }
  }

  pub fn counts(&self) -> &RequiredCounts {
    &self.counts
  }

  /// Computes which vehicles to strip for `target` on `active`.
  ///
  /// The active vehicle is never part of the plan, and neither is any vehicle
  /// that is not alive. The plan may still fall short; the apply step decides
  /// whether the request became satisfiable.
  pub fn plan(
    &self,
    catalog: &dyn Catalog,
    tracker: &FrequencyTracker<VehicleId>,
    active: VehicleId,
    target: ReclaimTarget<'_>,
  ) -> ReclaimPlan {
    let vehicles = catalog.owned_vehicles();
    let mut snapshot = self.snapshot(catalog, active, &target);
    let wanted = target.configuration();

    let mut plan = ReclaimPlan::default();
    for vehicle in tracker.sort_least_frequent(vehicles, |v| v.id) {
      if vehicle.id == active || !vehicle.alive {
        continue;
      }

      let outfits = applied_outfits(catalog, vehicle.id);
      let short = outfits
        .values()
        .flat_map(|outfit| outfit.items.iter())
        .find(|item| match snapshot.available(item.id) {
          Some(available) => available < self.counts.required(item, wanted),
          None => false,
        });

      let Some(short) = short else {
        continue;
      };
      tracing::debug!(
        vehicle = %vehicle.id,
        item = short.id.0,
        "vehicle holds a scarce item, scheduling full demount"
      );

      // The whole outfit comes off, so every copy it holds frees up.
      for item in outfits.values().flat_map(|outfit| outfit.items.iter()) {
        snapshot.credit(item.id);
      }
      plan.demounts.extend(outfits.keys().map(|season| Demount {
        vehicle: vehicle.id,
        season: *season,
      }));
      plan.flagged.push(vehicle.id);
    }

    plan
  }

  fn snapshot(
    &self,
    catalog: &dyn Catalog,
    active: VehicleId,
    target: &ReclaimTarget<'_>,
  ) -> InventorySnapshot {
    let mut snapshot = InventorySnapshot {
      available: catalog
        .compatible_items(active)
        .into_iter()
        .map(|(id, stock)| (id, stock.full_inventory_count))
        .collect(),
    };

    // Copies already on the active vehicle are spent on it and count as supply.
    for (season, outfit) in applied_outfits(catalog, active) {
      if !target.credits_season(season) {
        continue;
      }
      for item in &outfit.items {
        snapshot.credit(item.id);
      }
    }
    snapshot
  }
}
