#![allow(dead_code)]

use async_trait::async_trait;
use livery_engine::{
  Applier, ApplyError, ApplyRequest, CacheMap, Catalog, Descriptor, EngineConfig, Item, ItemId,
  ItemKind, Notifier, Outfit, Season, SeasonSet, Session, Severity, StockItem, Swapper,
  SwapperBuilder, VehicleId, VehicleInfo,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const NAMESPACE: &str = "tester@EU";
pub const PAINT: u32 = 10;
pub const CAMO: u32 = 11;

/// Routes engine logs to the test harness. `RUST_LOG=livery_engine=debug` shows them.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// Builds a cache from `(vehicle, [(season, descriptor)])` pairs.
pub fn cache(entries: &[(u32, &[(Season, &str)])]) -> CacheMap {
  entries
    .iter()
    .map(|(id, seasons)| {
      let configuration = seasons
        .iter()
        .map(|(season, token)| (*season, Descriptor::new(*token)))
        .collect();
      (VehicleId(*id), configuration)
    })
    .collect()
}

#[derive(Default)]
struct Garage {
  vehicles: Vec<VehicleInfo>,
  items: HashMap<ItemId, (Item, u32)>,
  outfits: HashMap<Descriptor, Vec<ItemId>>,
  mounted: HashMap<(VehicleId, Season), Descriptor>,
  styled: HashMap<(VehicleId, Season), Descriptor>,
  incompatible: HashSet<ItemId>,
  current: Option<VehicleId>,
  tutorial: bool,
  replay: bool,
  reject_applies: bool,
}

impl Garage {
  fn items_of(&self, descriptor: &Descriptor) -> Vec<Item> {
    self
      .outfits
      .get(descriptor)
      .map(|ids| ids.iter().map(|id| self.items[id].0).collect())
      .unwrap_or_default()
  }

  fn mounted_copies(&self, id: ItemId) -> u32 {
    self
      .mounted
      .values()
      .flat_map(|d| self.outfits.get(d).into_iter().flatten())
      .filter(|item| **item == id)
      .count() as u32
  }

  fn free(&self, id: ItemId) -> u32 {
    self.items[&id].1.saturating_sub(self.mounted_copies(id))
  }
}

/// An in-memory stand-in for the host client.
///
/// Items are compatible with every vehicle unless marked otherwise. An item's inventory count is
/// its owned copies minus the copies mounted anywhere in the garage.
#[derive(Default)]
pub struct FakeHost {
  garage: Mutex<Garage>,
  pub requests: Mutex<Vec<ApplyRequest>>,
  pub messages: Mutex<Vec<(String, Severity)>>,
  in_flight: AtomicUsize,
  gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeHost {
  pub fn new() -> Arc<Self> {
    init_tracing();
    Arc::new(Self::default())
  }

  /// Alpha (active) wears "X" and wants "Y". With `paint_copies` above zero,
  /// Bravo holds a paint copy "Y" needs through its own outfit "Z".
  pub fn contested(paint_copies: u32) -> Arc<Self> {
    let host = Self::new();
    host
      .add_vehicle(1, "Alpha")
      .add_vehicle(2, "Bravo")
      .add_vehicle(3, "Charlie")
      .item(PAINT, ItemKind::Paint, paint_copies)
      .item(CAMO, ItemKind::Camouflage, 5)
      .outfit("X", &[CAMO])
      .outfit("Y", &[PAINT, CAMO])
      .outfit("Z", &[PAINT])
      .mount(1, Season::Summer, "X")
      .select(Some(1));
    if paint_copies > 0 {
      host.mount(2, Season::Summer, "Z");
    }
    host
  }

  pub fn add_vehicle(&self, id: u32, name: &str) -> &Self {
    self.garage.lock().vehicles.push(VehicleInfo {
      id: VehicleId(id),
      alive: true,
      display_name: name.to_string(),
    });
    self
  }

  pub fn set_alive(&self, id: u32, alive: bool) -> &Self {
    for vehicle in self.garage.lock().vehicles.iter_mut() {
      if vehicle.id == VehicleId(id) {
        vehicle.alive = alive;
      }
    }
    self
  }

  pub fn item(&self, id: u32, kind: ItemKind, owned: u32) -> &Self {
    let item = Item {
      id: ItemId(id),
      kind,
      seasons: SeasonSet::ALL,
    };
    self.garage.lock().items.insert(ItemId(id), (item, owned));
    self
  }

  /// Hides `id` from every vehicle's compatible items.
  pub fn incompatible(&self, id: u32) -> &Self {
    self.garage.lock().incompatible.insert(ItemId(id));
    self
  }

  pub fn outfit(&self, token: &str, items: &[u32]) -> &Self {
    self.garage.lock().outfits.insert(
      Descriptor::new(token),
      items.iter().copied().map(ItemId).collect(),
    );
    self
  }

  pub fn mount(&self, vehicle: u32, season: Season, token: &str) -> &Self {
    self
      .garage
      .lock()
      .mounted
      .insert((VehicleId(vehicle), season), Descriptor::new(token));
    self
  }

  pub fn style(&self, vehicle: u32, season: Season, token: &str) -> &Self {
    self
      .garage
      .lock()
      .styled
      .insert((VehicleId(vehicle), season), Descriptor::new(token));
    self
  }

  pub fn select(&self, vehicle: Option<u32>) -> &Self {
    self.garage.lock().current = vehicle.map(VehicleId);
    self
  }

  pub fn set_tutorial(&self, tutorial: bool) -> &Self {
    self.garage.lock().tutorial = tutorial;
    self
  }

  pub fn set_replay(&self, replay: bool) -> &Self {
    self.garage.lock().replay = replay;
    self
  }

  pub fn reject_applies(&self, reject: bool) -> &Self {
    self.garage.lock().reject_applies = reject;
    self
  }

  /// Makes every apply wait for a permit on the returned semaphore.
  pub fn hold_applies(&self) -> Arc<Semaphore> {
    let gate = Arc::new(Semaphore::new(0));
    *self.gate.lock() = Some(Arc::clone(&gate));
    gate
  }

  pub fn in_flight(&self) -> usize {
    self.in_flight.load(Ordering::SeqCst)
  }

  pub fn mounted(&self, vehicle: u32, season: Season) -> Option<String> {
    self
      .garage
      .lock()
      .mounted
      .get(&(VehicleId(vehicle), season))
      .map(|d| d.as_str().to_string())
  }

  pub fn free(&self, item: u32) -> u32 {
    self.garage.lock().free(ItemId(item))
  }

  pub fn requests(&self) -> Vec<ApplyRequest> {
    self.requests.lock().clone()
  }

  pub fn messages(&self) -> Vec<(String, Severity)> {
    self.messages.lock().clone()
  }

  pub fn swapper(self: &Arc<Self>, dir: &std::path::Path) -> Swapper {
    self.swapper_with(dir, EngineConfig::default())
  }

  pub fn swapper_with(self: &Arc<Self>, dir: &std::path::Path, config: EngineConfig) -> Swapper {
    SwapperBuilder::new()
      .catalog(Arc::clone(self) as Arc<dyn Catalog>)
      .applier(Arc::clone(self) as Arc<dyn Applier>)
      .session(Arc::clone(self) as Arc<dyn Session>)
      .notifier(Arc::clone(self) as Arc<dyn Notifier>)
      .config(config)
      .cache_dir(dir)
      .build()
      .unwrap()
  }
}

impl Catalog for FakeHost {
  fn owned_vehicles(&self) -> Vec<VehicleInfo> {
    self.garage.lock().vehicles.clone()
  }

  fn compatible_items(&self, _vehicle: VehicleId) -> HashMap<ItemId, StockItem> {
    let garage = self.garage.lock();
    garage
      .items
      .iter()
      .filter(|(id, _)| !garage.incompatible.contains(*id))
      .map(|(id, (item, _))| {
        (
          *id,
          StockItem {
            item: *item,
            full_inventory_count: garage.free(*id),
          },
        )
      })
      .collect()
  }

  fn current_outfit(&self, vehicle: VehicleId, season: Season) -> Option<Outfit> {
    let garage = self.garage.lock();
    let descriptor = garage.mounted.get(&(vehicle, season))?.clone();
    let items = garage.items_of(&descriptor);
    Some(Outfit { descriptor, items })
  }

  fn styled_descriptor(&self, vehicle: VehicleId, season: Season) -> Option<Descriptor> {
    self.garage.lock().styled.get(&(vehicle, season)).cloned()
  }

  fn resolve(&self, descriptor: &Descriptor) -> Outfit {
    Outfit {
      descriptor: descriptor.clone(),
      items: self.garage.lock().items_of(descriptor),
    }
  }
}

#[async_trait]
impl Applier for FakeHost {
  async fn apply(&self, request: ApplyRequest) -> Result<(), ApplyError> {
    self.requests.lock().push(request.clone());
    self.in_flight.fetch_add(1, Ordering::SeqCst);

    let gate = self.gate.lock().clone();
    if let Some(gate) = gate {
      if let Ok(permit) = gate.acquire().await {
        permit.forget();
      }
    }
    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    let mut garage = self.garage.lock();
    let key = (request.vehicle, request.season);
    let Some(outfit) = request.outfit else {
      garage.mounted.remove(&key);
      return Ok(());
    };
    if garage.reject_applies {
      return Err(ApplyError::Rejected("maintenance".to_string()));
    }

    // Copies on the season being replaced come back before the new ones go on.
    let previous = garage.mounted.remove(&key);
    let short = outfit.items.iter().any(|item| {
      let needed = outfit.items.iter().filter(|i| i.id == item.id).count() as u32;
      garage.free(item.id) < needed
    });
    if short {
      if let Some(previous) = previous {
        garage.mounted.insert(key, previous);
      }
      return Err(ApplyError::InsufficientItems);
    }
    garage.mounted.insert(key, outfit.descriptor);
    Ok(())
  }
}

impl Session for FakeHost {
  fn player_name(&self) -> Option<String> {
    Some("tester".to_string())
  }

  fn realm(&self) -> String {
    "EU".to_string()
  }

  fn is_tutorial(&self) -> bool {
    self.garage.lock().tutorial
  }

  fn is_replay(&self) -> bool {
    self.garage.lock().replay
  }

  fn current_vehicle(&self) -> Option<VehicleId> {
    self.garage.lock().current
  }
}

impl Notifier for FakeHost {
  fn push_message(&self, text: &str, severity: Severity) {
    self.messages.lock().push((text.to_string(), severity));
  }
}
