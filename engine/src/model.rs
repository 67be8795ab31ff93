//! The value types shared by the tracker, the reclaim engine and the swapper.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Compact identifier of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Compact identifier of a cosmetic item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

/// The seasonal slots an outfit can be applied to. Each one is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
  Summer,
  Winter,
  Desert,
}

impl Season {
  pub const ALL: [Season; 3] = [Season::Summer, Season::Winter, Season::Desert];

  fn bit(self) -> u8 {
    match self {
      Season::Summer => 0b001,
      Season::Winter => 0b010,
      Season::Desert => 0b100,
    }
  }
}

impl fmt::Display for Season {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Season::Summer => write!(f, "summer"),
      Season::Winter => write!(f, "winter"),
      Season::Desert => write!(f, "desert"),
    }
  }
}

/// A set of seasons, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SeasonSet(u8);

impl SeasonSet {
  pub const EMPTY: SeasonSet = SeasonSet(0);
  pub const ALL: SeasonSet = SeasonSet(0b111);

  pub fn contains(self, season: Season) -> bool {
    self.0 & season.bit() != 0
  }

  pub fn with(self, season: Season) -> Self {
    SeasonSet(self.0 | season.bit())
  }

  pub fn len(self) -> usize {
    self.0.count_ones() as usize
  }

  pub fn is_empty(self) -> bool {
    self.0 == 0
  }
}

impl FromIterator<Season> for SeasonSet {
  fn from_iter<I: IntoIterator<Item = Season>>(iter: I) -> Self {
    iter.into_iter().fold(SeasonSet::EMPTY, SeasonSet::with)
  }
}

/// The category of a cosmetic item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
  Paint,
  Emblem,
  Inscription,
  Modification,
  Camouflage,
  /// Anything the fixed per-kind costs do not cover (styles, decals).
  Other,
}

/// One copy of a cosmetic item as it appears in an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
  pub id: ItemId,
  pub kind: ItemKind,
  /// Seasons the item may be used in.
  pub seasons: SeasonSet,
}

/// Opaque token naming one exact item-set. Equal tokens denote equal sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(pub String);

impl Descriptor {
  pub fn new(token: impl Into<String>) -> Self {
    Descriptor(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Descriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A descriptor resolved into the item copies it mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outfit {
  pub descriptor: Descriptor,
  pub items: Vec<Item>,
}

impl Outfit {
  /// Items present in `new` but not in `self`, counting repeated copies.
  pub fn added_items(&self, new: &Outfit) -> Vec<Item> {
    let mut remaining = count_by_id(&self.items);
    let mut added = Vec::new();
    for item in &new.items {
      match remaining.get_mut(&item.id) {
        Some(count) if *count > 0 => *count -= 1,
        _ => added.push(*item),
      }
    }
    added
  }
}

/// Desired or applied outfit descriptors, per season.
pub type Configuration = BTreeMap<Season, Descriptor>;

/// A configuration whose descriptors were resolved into outfits.
pub type ResolvedConfiguration = BTreeMap<Season, Outfit>;

/// The value cached per namespace: every known vehicle's configuration.
pub type CacheMap = BTreeMap<VehicleId, Configuration>;

/// Descriptors of a resolved configuration.
pub fn descriptors_of(outfits: &ResolvedConfiguration) -> Configuration {
  outfits
    .iter()
    .map(|(season, outfit)| (*season, outfit.descriptor.clone()))
    .collect()
}

/// Items added when moving from `current` to `new`, season by season.
pub fn added_items(current: &ResolvedConfiguration, new: &ResolvedConfiguration) -> Vec<Item> {
  new
    .iter()
    .flat_map(|(season, outfit)| match current.get(season) {
      Some(existing) => existing.added_items(outfit),
      None => outfit.items.clone(),
    })
    .collect()
}

/// Number of copies of each item id.
pub fn count_by_id(items: &[Item]) -> HashMap<ItemId, u32> {
  let mut counts = HashMap::new();
  for item in items {
    *counts.entry(item.id).or_insert(0) += 1;
  }
  counts
}

/// A vehicle in the player's garage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInfo {
  pub id: VehicleId,
  /// `false` while the vehicle is locked in battle or otherwise unusable.
  pub alive: bool,
  pub display_name: String,
}

/// An item compatible with a vehicle and how many copies of it are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockItem {
  pub item: Item,
  pub full_inventory_count: u32,
}
