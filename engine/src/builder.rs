use crate::config::EngineConfig;
use crate::error::{BuildError, Result};
use crate::frequency::FrequencyTracker;
use crate::guard::RunGuard;
use crate::host::{Applier, Catalog, Notifier, Session};
use crate::metrics::Metrics;
use crate::model::CacheMap;
use crate::reclaim::ReclaimEngine;
use crate::swapper::Swapper;

use core::fmt;
use livery_store::NamespacedStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the outfit cache lives.
enum StoreSource {
  /// `config.cache_dir_name` under the platform's local data directory.
  AppDir,
  /// An explicit directory; the file name still comes from the config.
  Dir(PathBuf),
  /// A store the caller already opened, possibly shared.
  Shared(Arc<NamespacedStore<CacheMap>>),
}

/// A builder for [`Swapper`] instances.
///
/// The four host collaborators are required; everything else has a default.
pub struct SwapperBuilder {
  catalog: Option<Arc<dyn Catalog>>,
  applier: Option<Arc<dyn Applier>>,
  session: Option<Arc<dyn Session>>,
  notifier: Option<Arc<dyn Notifier>>,
  store: StoreSource,
  config: EngineConfig,
}

impl fmt::Debug for SwapperBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SwapperBuilder")
      .field("has_catalog", &self.catalog.is_some())
      .field("has_applier", &self.applier.is_some())
      .field("has_session", &self.session.is_some())
      .field("has_notifier", &self.notifier.is_some())
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl Default for SwapperBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl SwapperBuilder {
  pub fn new() -> Self {
    Self {
      catalog: None,
      applier: None,
      session: None,
      notifier: None,
      store: StoreSource::AppDir,
      config: EngineConfig::default(),
    }
  }

  pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
    self.catalog = Some(catalog);
    self
  }

  pub fn applier(mut self, applier: Arc<dyn Applier>) -> Self {
    self.applier = Some(applier);
    self
  }

  pub fn session(mut self, session: Arc<dyn Session>) -> Self {
    self.session = Some(session);
    self
  }

  pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = Some(notifier);
    self
  }

  pub fn config(mut self, config: EngineConfig) -> Self {
    self.config = config;
    self
  }

  /// Keeps the cache files in `dir` instead of the local data directory.
  pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.store = StoreSource::Dir(dir.into());
    self
  }

  /// Uses an already opened store.
  pub fn store(mut self, store: Arc<NamespacedStore<CacheMap>>) -> Self {
    self.store = StoreSource::Shared(store);
    self
  }

  /// Builds the swapper, opening the cache directory if needed.
  pub fn build(self) -> Result<Swapper> {
    self.config.validate()?;

    let catalog = self.catalog.ok_or(BuildError::Missing("catalog"))?;
    let applier = self.applier.ok_or(BuildError::Missing("applier"))?;
    let session = self.session.ok_or(BuildError::Missing("session"))?;
    let notifier = self.notifier.ok_or(BuildError::Missing("notifier"))?;

    let store = match self.store {
      StoreSource::AppDir => Arc::new(NamespacedStore::in_app_dir(
        &self.config.cache_dir_name,
        self.config.cache_file_name.clone(),
      )?),
      StoreSource::Dir(dir) => Arc::new(NamespacedStore::open(
        dir,
        self.config.cache_file_name.clone(),
      )?),
      StoreSource::Shared(store) => store,
    };

    Ok(Swapper {
      catalog,
      applier,
      session,
      notifier,
      store,
      tracker: FrequencyTracker::new(),
      engine: ReclaimEngine::new(self.config.required_counts),
      config: self.config,
      swap_guard: RunGuard::new(),
      reclaim_guard: RunGuard::new(),
      metrics: Metrics::new(),
    })
  }
}
