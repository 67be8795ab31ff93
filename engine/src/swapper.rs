//! The swap workflow: bring the active vehicle back to its remembered outfit.

use crate::config::{EngineConfig, MessageTemplates};
use crate::error::Result;
use crate::frequency::FrequencyTracker;
use crate::guard::RunGuard;
use crate::host::{
  applied_descriptors, applied_outfits, cache_namespace, resolve_all, Applier, ApplyRequest,
  Catalog, InventorySync, Notifier, Session, Severity, SyncReason,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::model::{
  added_items, count_by_id, descriptors_of, CacheMap, Item, ItemKind, ResolvedConfiguration,
  Season, VehicleId, VehicleInfo,
};
use crate::reclaim::{ReclaimEngine, ReclaimPlan, ReclaimTarget};

use futures_util::future;
use livery_store::NamespacedStore;
use std::sync::Arc;

/// Why a swap was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapTrigger {
  /// The player selected another vehicle.
  VehicleChanged,
  /// An inventory sync suggests a vehicle came back from battle.
  ///
  /// Shortfalls are expected here and are not reported to the player.
  VehicleReturning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
  Tutorial,
  NoVehicle,
  VehicleUnavailable,
}

/// What a swap run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
  /// Another swap was in flight; this one was dropped.
  Skipped,
  Aborted(AbortReason),
  /// The vehicle already wears its cached outfit.
  UpToDate,
  Applied { demounted: usize, applied: usize },
  /// The inventory could not cover the outfit, even after reclaiming.
  Insufficient { demounted: usize },
  /// The applier rejected at least one of the outfit requests.
  Failed { demounted: usize },
}

/// What a season reclaim did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReclaimOutcome {
  Skipped,
  Aborted(AbortReason),
  Reclaimed { plan: ReclaimPlan, failed: usize },
}

/// What the inventory listener did with a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
  Ignored,
  /// The active vehicle's outfit was changed by hand and is now cached.
  Recorded(VehicleId),
  Swapped(SwapOutcome),
}

/// Keeps every vehicle in its remembered outfit.
///
/// Build one with [`SwapperBuilder`](crate::SwapperBuilder). A `Swapper` is
/// shared behind an `Arc`; every operation takes `&self`.
pub struct Swapper {
  pub(crate) catalog: Arc<dyn Catalog>,
  pub(crate) applier: Arc<dyn Applier>,
  pub(crate) session: Arc<dyn Session>,
  pub(crate) notifier: Arc<dyn Notifier>,
  pub(crate) store: Arc<NamespacedStore<CacheMap>>,
  pub(crate) tracker: FrequencyTracker<VehicleId>,
  pub(crate) engine: ReclaimEngine,
  pub(crate) config: EngineConfig,
  pub(crate) swap_guard: RunGuard,
  pub(crate) reclaim_guard: RunGuard,
  pub(crate) metrics: Metrics,
}

impl std::fmt::Debug for Swapper {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Swapper")
      .field("store", &self.store)
      .field("config", &self.config)
      .field("swap_running", &self.swap_guard.is_running())
      .finish_non_exhaustive()
  }
}

impl Swapper {
  pub fn metrics(&self) -> MetricsSnapshot {
    self.metrics.snapshot()
  }

  pub fn tracker(&self) -> &FrequencyTracker<VehicleId> {
    &self.tracker
  }

  pub fn store(&self) -> &NamespacedStore<CacheMap> {
    &self.store
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// The cache namespace of the current session.
  pub fn namespace(&self) -> Option<String> {
    cache_namespace(self.session.as_ref())
  }

  /// Records the applied outfit of every owned vehicle the cache does not
  /// know yet, so a first swap never strips a vehicle it has not seen.
  pub fn init_cache(&self, namespace: Option<&str>) -> Result<()> {
    let cached = self.store.get(namespace, CacheMap::new())?;
    let mut warmed: CacheMap = self
      .catalog
      .owned_vehicles()
      .into_iter()
      .filter(|v| !cached.contains_key(&v.id))
      .map(|v| (v.id, applied_descriptors(self.catalog.as_ref(), v.id)))
      .collect();
    if warmed.is_empty() {
      return Ok(());
    }

    tracing::debug!(namespace = ?namespace, vehicles = warmed.len(), "warming outfit cache");
    warmed.extend(cached);
    self.write_cache(warmed, namespace)
  }

  /// [`init_cache`](Self::init_cache), plus a `{namespace}_backup` baseline
  /// that is filled once and never overwritten afterwards.
  pub fn init_cache_with_backup(&self, namespace: Option<&str>) -> Result<()> {
    self.init_cache(namespace)?;

    let Some(ns) = namespace else {
      return Ok(());
    };
    let backup = format!("{}_backup", ns);
    if self.store.get(Some(&backup), CacheMap::new())?.is_empty() {
      self.init_cache(Some(&backup))?;
    }
    Ok(())
  }

  /// Applies the cached outfit to the active vehicle, reclaiming items from
  /// rarely used vehicles first when the inventory is short.
  ///
  /// Only one swap runs at a time; a call made while another is in flight
  /// returns [`SwapOutcome::Skipped`] without doing anything.
  pub async fn swap(&self, trigger: SwapTrigger) -> Result<SwapOutcome> {
    let Some(_token) = self.swap_guard.try_enter() else {
      Metrics::bump(&self.metrics.swaps_skipped, 1);
      tracing::debug!(?trigger, "swap already running, dropping this one");
      return Ok(SwapOutcome::Skipped);
    };
    Metrics::bump(&self.metrics.swaps_started, 1);

    let namespace = self.namespace();
    self.warm(namespace.as_deref())?;

    let vehicle = match self.active_vehicle() {
      Ok(vehicle) => vehicle,
      Err(reason) => {
        tracing::debug!(?reason, "swap aborted");
        return Ok(SwapOutcome::Aborted(reason));
      }
    };
    self.tracker.select(&vehicle.id);

    let cache = self.read_cache(namespace.as_deref())?;
    let desired = cache.get(&vehicle.id).cloned().unwrap_or_default();
    let current = applied_outfits(self.catalog.as_ref(), vehicle.id);
    let current_descriptors = descriptors_of(&current);

    let must_apply: Vec<Season> = desired
      .iter()
      .filter(|(season, descriptor)| current_descriptors.get(*season) != Some(*descriptor))
      .map(|(season, _)| *season)
      .collect();
    if must_apply.is_empty() {
      return Ok(SwapOutcome::UpToDate);
    }

    let wanted = resolve_all(self.catalog.as_ref(), &desired);
    let plan = self.engine.plan(
      self.catalog.as_ref(),
      &self.tracker,
      vehicle.id,
      ReclaimTarget::Configuration(&wanted),
    );
    let demounted = plan.demounts.len();
    if !plan.is_empty() {
      tracing::info!(vehicle = %vehicle.id, demounts = demounted, flagged = ?plan.flagged, "reclaiming items");
      Metrics::bump(&self.metrics.demounts_issued, demounted as u64);
      self.issue(plan.requests()).await;
    }

    let mounted = applied_outfits(self.catalog.as_ref(), vehicle.id);
    if !self.covers(vehicle.id, &mounted, &wanted) {
      tracing::info!(vehicle = %vehicle.id, "inventory cannot cover the cached outfit");
      if trigger != SwapTrigger::VehicleReturning {
        self.warn_not_applied(&vehicle);
      }
      return Ok(SwapOutcome::Insufficient { demounted });
    }

    let requests: Vec<ApplyRequest> = must_apply
      .iter()
      .filter_map(|season| {
        wanted.get(season).map(|outfit| ApplyRequest {
          vehicle: vehicle.id,
          season: *season,
          outfit: Some(outfit.clone()),
        })
      })
      .collect();
    let applied = requests.len();
    Metrics::bump(&self.metrics.applies_issued, applied as u64);
    if self.issue(requests).await > 0 {
      if trigger != SwapTrigger::VehicleReturning {
        self.warn_not_applied(&vehicle);
      }
      return Ok(SwapOutcome::Failed { demounted });
    }

    tracing::info!(vehicle = %vehicle.id, seasons = ?must_apply, "cached outfit applied");
    self.report_applied(&vehicle, &added_items(&current, &wanted));
    Ok(SwapOutcome::Applied { demounted, applied })
  }

  /// Frees enough items for the player to fully equip `season` of the
  /// active vehicle by hand.
  pub async fn reclaim_for_season(&self, season: Season) -> Result<ReclaimOutcome> {
    let Some(_token) = self.reclaim_guard.try_enter() else {
      Metrics::bump(&self.metrics.reclaims_skipped, 1);
      return Ok(ReclaimOutcome::Skipped);
    };

    let vehicle = match self.active_vehicle() {
      Ok(vehicle) => vehicle,
      Err(reason) => return Ok(ReclaimOutcome::Aborted(reason)),
    };

    let plan = self.engine.plan(
      self.catalog.as_ref(),
      &self.tracker,
      vehicle.id,
      ReclaimTarget::Season(season),
    );
    let mut failed = 0;
    if !plan.is_empty() {
      tracing::info!(vehicle = %vehicle.id, %season, demounts = plan.demounts.len(), "reclaiming items for manual edit");
      Metrics::bump(&self.metrics.demounts_issued, plan.demounts.len() as u64);
      failed = self.issue(plan.requests()).await;
    }
    Ok(ReclaimOutcome::Reclaimed { plan, failed })
  }

  /// Stores the active vehicle's applied outfit as its desired outfit.
  ///
  /// Returns the vehicle that was recorded, if there is an active one.
  pub fn record_current_outfit(&self) -> Result<Option<VehicleId>> {
    let Some(vehicle) = self.session.current_vehicle() else {
      return Ok(None);
    };
    let outfits = applied_descriptors(self.catalog.as_ref(), vehicle);

    let namespace = self.namespace();
    self.warm(namespace.as_deref())?;
    let mut cached = self.read_cache(namespace.as_deref())?;
    cached.insert(vehicle, outfits);
    self.write_cache(cached, namespace.as_deref())?;

    tracing::debug!(vehicle = %vehicle, "recorded hand-applied outfit");
    Ok(Some(vehicle))
  }

  pub async fn on_vehicle_changed(&self) -> Result<SwapOutcome> {
    self.swap(SwapTrigger::VehicleChanged).await
  }

  /// The customization panel opens on the summer season.
  pub async fn on_customization_opening(&self) -> Result<ReclaimOutcome> {
    self.reclaim_for_season(Season::Summer).await
  }

  pub async fn on_season_changing(&self, season: Season) -> Result<ReclaimOutcome> {
    self.reclaim_for_season(season).await
  }

  /// Keeps the cache in step with outfit changes made outside the engine,
  /// and re-runs the swap when a sync looks like a vehicle coming back.
  pub async fn on_inventory_synced(&self, sync: &InventorySync) -> Result<SyncOutcome> {
    let Some(vehicles) = &sync.vehicles else {
      return Ok(SyncOutcome::Ignored);
    };
    if sync.reason != SyncReason::ClientUpdate || self.session.is_tutorial() {
      return Ok(SyncOutcome::Ignored);
    }

    let active = self.session.current_vehicle();
    if let Some(active) = active.filter(|id| sync.outfits_changed && vehicles.contains(id)) {
      self.record_current_outfit()?;
      return Ok(SyncOutcome::Recorded(active));
    }

    let outcome = self.swap(SwapTrigger::VehicleReturning).await?;
    Ok(SyncOutcome::Swapped(outcome))
  }

  fn warm(&self, namespace: Option<&str>) -> Result<()> {
    let result = if self.config.keep_backup {
      self.init_cache_with_backup(namespace)
    } else {
      self.init_cache(namespace)
    };
    if let Err(e) = &result {
      tracing::warn!(namespace = ?namespace, error = %e, "outfit cache unavailable");
    }
    result
  }

  fn read_cache(&self, namespace: Option<&str>) -> Result<CacheMap> {
    self.store.get(namespace, CacheMap::new()).map_err(|e| {
      tracing::warn!(namespace = ?namespace, error = %e, "outfit cache unreadable");
      e.into()
    })
  }

  fn write_cache(&self, cache: CacheMap, namespace: Option<&str>) -> Result<()> {
    self.store.set(cache, namespace)?;
    Metrics::bump(&self.metrics.cache_writes, 1);
    Ok(())
  }

  fn active_vehicle(&self) -> Result<VehicleInfo, AbortReason> {
    if self.session.is_tutorial() {
      return Err(AbortReason::Tutorial);
    }
    let id = self.session.current_vehicle().ok_or(AbortReason::NoVehicle)?;
    match self.catalog.vehicle(id) {
      Some(vehicle) if vehicle.alive => Ok(vehicle),
      _ => Err(AbortReason::VehicleUnavailable),
    }
  }

  // Sends a batch and waits for all of it. Returns how many requests failed.
  async fn issue(&self, requests: Vec<ApplyRequest>) -> usize {
    let results = future::join_all(
      requests
        .iter()
        .cloned()
        .map(|request| self.applier.apply(request)),
    )
    .await;

    let mut failed = 0;
    for (request, result) in requests.iter().zip(results) {
      if let Err(e) = result {
        failed += 1;
        tracing::warn!(
          vehicle = %request.vehicle,
          season = %request.season,
          demount = request.is_demount(),
          error = %e,
          "apply request failed"
        );
      }
    }
    Metrics::bump(&self.metrics.apply_failures, failed as u64);
    failed
  }

  // Whether the vehicle's compatible stock covers every item `wanted` adds.
  fn covers(
    &self,
    vehicle: VehicleId,
    mounted: &ResolvedConfiguration,
    wanted: &ResolvedConfiguration,
  ) -> bool {
    let stock = self.catalog.compatible_items(vehicle);
    count_by_id(&added_items(mounted, wanted))
      .into_iter()
      .all(|(id, needed)| stock.get(&id).map_or(0, |s| s.full_inventory_count) >= needed)
  }

  fn report_applied(&self, vehicle: &VehicleInfo, added: &[Item]) {
    let templates = &self.config.messages;
    let mut lines = vec![render(&templates.header, &vehicle.display_name, None)];

    let counted = [
      (ItemKind::Camouflage, &templates.camouflages_added),
      (ItemKind::Paint, &templates.paints_added),
      (ItemKind::Modification, &templates.modifications_added),
    ];
    for (kind, template) in counted {
      let count = added.iter().filter(|item| item.kind == kind).count();
      if count > 0 {
        lines.push(render(template, &vehicle.display_name, Some(count)));
      }
    }

    if lines.len() > 1 {
      self.notifier.push_message(&lines.join("\n"), Severity::Information);
    }
  }

  fn warn_not_applied(&self, vehicle: &VehicleInfo) {
    let MessageTemplates {
      header,
      server_error,
      ..
    } = &self.config.messages;
    let text = format!(
      "{}\n{}",
      render(header, &vehicle.display_name, None),
      render(server_error, &vehicle.display_name, None)
    );
    self.notifier.push_message(&text, Severity::Warning);
  }
}

fn render(template: &str, name: &str, count: Option<usize>) -> String {
  let text = template.replace("{name}", name);
  match count {
    Some(count) => text.replace("{count}", &count.to_string()),
    None => text,
  }
}
