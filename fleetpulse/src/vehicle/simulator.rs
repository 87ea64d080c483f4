//! Background simulation daemon.
//!
//! Drives the fixed-period tick that advances every registered vehicle for
//! as long as the process runs. The daemon owns no vehicle state of its own;
//! each tick is delegated to the engines, which serialize against concurrent
//! ignition toggles through their own locks.
//!
//! # Example
//!
//! ```ignore
//! use fleetpulse::vehicle::SimulationDaemon;
//! use tokio_util::sync::CancellationToken;
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(SimulationDaemon::new(fleet).run(shutdown.clone()));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::fleet::Fleet;
use crate::config::DEFAULT_TICK_INTERVAL;

/// Background daemon that ticks every engine in a fleet on a fixed period.
pub struct SimulationDaemon {
    fleet: Arc<Fleet>,
    interval: Duration,
}

impl SimulationDaemon {
    /// Create a daemon with the default 3-second tick.
    pub fn new(fleet: Arc<Fleet>) -> Self {
        Self {
            fleet,
            interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Set a custom tick period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the tick loop until shutdown is signalled.
    ///
    /// Ticks are not cancellable individually; they complete in bounded time
    /// and the loop re-checks the token between them.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            vehicles = self.fleet.len(),
            "Vehicle simulation starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Vehicle simulation shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.fleet.tick_all();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::store::{MemoryTripStore, TripStore};
    use crate::vehicle::VehicleEngine;

    fn make_fleet() -> (Arc<Fleet>, Arc<VehicleEngine>) {
        let store: Arc<dyn TripStore> = Arc::new(MemoryTripStore::new());
        let engine = Arc::new(VehicleEngine::new(&SimulationConfig::default(), store));
        let fleet = Arc::new(Fleet::new());
        fleet.register(Arc::clone(&engine));
        (fleet, engine)
    }

    #[tokio::test]
    async fn test_daemon_ticks_engines() {
        let (fleet, engine) = make_fleet();
        let (snapshot, mut rx) = engine.subscribe();

        let shutdown = CancellationToken::new();
        let daemon = SimulationDaemon::new(fleet).with_interval(Duration::from_millis(10));
        let handle = tokio::spawn(daemon.run(shutdown.clone()));

        // Wait for at least one periodic snapshot
        let update = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("daemon should tick within a second")
            .expect("broadcast should be open");
        assert!(update.last_update >= snapshot.last_update);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_daemon_stops_on_cancellation() {
        let (fleet, _engine) = make_fleet();

        let shutdown = CancellationToken::new();
        let daemon = SimulationDaemon::new(fleet).with_interval(Duration::from_millis(10));
        let handle = tokio::spawn(daemon.run(shutdown.clone()));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("daemon should stop promptly")
            .unwrap();
    }
}
