use crate::model::{Item, ItemKind, ResolvedConfiguration};

use serde::Deserialize;

/// Copies of an item a vehicle needs to be fully equipped.
///
/// These are tuning constants, loaded from configuration when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequiredCounts {
  pub paint: u32,
  pub emblem: u32,
  pub inscription: u32,
  pub modification: u32,
  /// Multiplied by the number of seasons the camouflage is valid for.
  pub camouflage_per_season: u32,
}

impl Default for RequiredCounts {
  fn default() -> Self {
    Self {
      paint: 5,
      emblem: 2,
      inscription: 2,
      modification: 1,
      camouflage_per_season: 1,
    }
  }
}

impl RequiredCounts {
  /// How many copies of `item` a request needs.
  ///
  /// With a target configuration this is the number of times the item occurs
  /// across the target's seasons. Without one it is the fixed cost of fully
  /// re-equipping a vehicle.
  pub fn required(&self, item: &Item, target: Option<&ResolvedConfiguration>) -> u32 {
    match target {
      Some(outfits) => outfits
        .values()
        .flat_map(|outfit| outfit.items.iter())
        .filter(|candidate| candidate.id == item.id)
        .count() as u32,
      None => self.full_equip(item),
    }
  }

  fn full_equip(&self, item: &Item) -> u32 {
    match item.kind {
      ItemKind::Paint => self.paint,
      ItemKind::Emblem => self.emblem,
      ItemKind::Inscription => self.inscription,
      ItemKind::Modification => self.modification,
      ItemKind::Camouflage => self.camouflage_per_season * item.seasons.len() as u32,
      ItemKind::Other => 0,
    }
  }
}
