//! Observer registration: the host pushes [`HostEvent`]s, the swapper reacts.
//!
//! Every event is handled on its own spawned task. Two events of the same
//! kind arriving back to back therefore meet at the swapper's run guard and
//! the second one is dropped, exactly as a direct duplicate call would be.

use crate::host::InventorySync;
use crate::model::Season;
use crate::runtime::TaskSpawner;
use crate::swapper::Swapper;

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Events the host's view and inventory layers raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
  VehicleChanged,
  CustomizationOpening,
  SeasonChanging(Season),
  InventorySynced(InventorySync),
}

/// The host's end of a subscription.
#[derive(Debug, Clone)]
pub struct EventSender {
  tx: mpsc::UnboundedSender<HostEvent>,
}

impl EventSender {
  /// Delivers an event. Returns `false` once the subscription has ended.
  pub fn send(&self, event: HostEvent) -> bool {
    self.tx.send(event).is_ok()
  }
}

/// Keeps the dispatcher alive. Dropping it unsubscribes.
#[derive(Debug)]
#[must_use = "dropping the subscription stops event dispatch"]
pub struct Subscription {
  shutdown: Option<oneshot::Sender<()>>,
}

impl Subscription {
  /// Stops dispatching. Handlers already running finish normally.
  pub fn unsubscribe(mut self) {
    self.stop();
  }

  fn stop(&mut self) {
    if let Some(shutdown) = self.shutdown.take() {
      let _ = shutdown.send(());
    }
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.stop();
  }
}

impl Swapper {
  /// Subscribes this swapper to host events.
  ///
  /// The dispatcher and every handler run on `spawner`.
  pub fn subscribe(self: &Arc<Self>, spawner: Arc<dyn TaskSpawner>) -> (EventSender, Subscription) {
    let (tx, mut rx) = mpsc::unbounded_channel::<HostEvent>();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let swapper = Arc::clone(self);
    let handler_spawner = Arc::clone(&spawner);
    spawner.spawn(Box::pin(async move {
      loop {
        tokio::select! {
          _ = &mut shutdown_rx => break,
          event = rx.recv() => match event {
            Some(event) => {
              let swapper = Arc::clone(&swapper);
              handler_spawner.spawn(Box::pin(handle(swapper, event)));
            }
            None => break,
          },
        }
      }
      tracing::debug!("host event dispatcher stopped");
    }));

    (
      EventSender { tx },
      Subscription {
        shutdown: Some(shutdown_tx),
      },
    )
  }
}

async fn handle(swapper: Arc<Swapper>, event: HostEvent) {
  let result = match &event {
    HostEvent::VehicleChanged => swapper.on_vehicle_changed().await.map(drop),
    HostEvent::CustomizationOpening => swapper.on_customization_opening().await.map(drop),
    HostEvent::SeasonChanging(season) => swapper.on_season_changing(*season).await.map(drop),
    HostEvent::InventorySynced(sync) => swapper.on_inventory_synced(sync).await.map(drop),
  };

  if let Err(e) = result {
    tracing::warn!(?event, error = %e, "host event handler failed");
  }
}
