//! Vehicle engine - owner of live state and trip lifecycle.
//!
//! The engine is the only writer of a vehicle's state. Its two mutation
//! entry points - the periodic [`tick`](VehicleEngine::tick) and the
//! external [`toggle_ignition`](VehicleEngine::toggle_ignition) command -
//! are serialized through one lock so a tick can never interleave with a
//! toggle mid-transition.
//!
//! # Broadcast
//!
//! Every settled mutation broadcasts one complete [`VehicleState`] snapshot.
//! The send is wait-free (ring buffer): performing it inside the critical
//! section keeps send order equal to mutation order, which is what gives
//! each subscriber snapshots in non-decreasing `last_update` order. Slow
//! subscribers lag and drop the oldest snapshots; they never block the
//! engine.
//!
//! # Persistence
//!
//! Completed trips are handed to the [`TripStore`] on a detached task after
//! the state lock is released. A failed save is reported through tracing and
//! never surfaced to the toggling caller: the ignition state machine has
//! already settled and losing a record must not wedge it.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::motion::{MotionModel, RandomWalk};
use super::state::VehicleState;
use crate::config::SimulationConfig;
use crate::store::TripStore;
use crate::trip::{Trip, TripLedger};

/// Everything the engine mutates, behind one lock.
struct EngineState {
    vehicle: VehicleState,
    ledger: TripLedger,
    motion: Box<dyn MotionModel>,
}

/// The telemetry engine for one vehicle.
///
/// Meant to be shared as `Arc<VehicleEngine>` between the simulation daemon
/// and request handlers.
pub struct VehicleEngine {
    state: RwLock<EngineState>,
    broadcast_tx: broadcast::Sender<VehicleState>,
    store: Arc<dyn TripStore>,
}

impl VehicleEngine {
    /// Create an engine with the default random-walk motion model.
    pub fn new(config: &SimulationConfig, store: Arc<dyn TripStore>) -> Self {
        Self::with_motion_model(config, store, Box::new(RandomWalk::from_config(config)))
    }

    /// Create an engine with a custom position-update strategy.
    ///
    /// This is the seam a real GPS feed plugs into.
    pub fn with_motion_model(
        config: &SimulationConfig,
        store: Arc<dyn TripStore>,
        motion: Box<dyn MotionModel>,
    ) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_capacity);
        let vehicle = VehicleState::parked(
            config.vehicle_id.clone(),
            config.start_position,
            Utc::now(),
        );
        let ledger = TripLedger::new(config.vehicle_id.clone());

        Self {
            state: RwLock::new(EngineState {
                vehicle,
                ledger,
                motion,
            }),
            broadcast_tx,
            store,
        }
    }

    /// The vehicle id this engine owns.
    pub fn vehicle_id(&self) -> String {
        self.state.read().unwrap().vehicle.vehicle_id.clone()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> VehicleState {
        self.state.read().unwrap().vehicle.clone()
    }

    /// Whether the ignition is currently on.
    pub fn ignition_on(&self) -> bool {
        self.state.read().unwrap().vehicle.ignition_on
    }

    /// Id of the open trip, if any.
    pub fn active_trip_id(&self) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .ledger
            .active_trip_id()
            .map(str::to_string)
    }

    /// The trip store this engine persists to.
    pub fn store(&self) -> &Arc<dyn TripStore> {
        &self.store
    }

    /// Attach a subscriber to the real-time channel.
    ///
    /// Returns the current snapshot together with the receiver. Holding the
    /// state lock across both makes the pair atomic: the snapshot reflects
    /// every mutation the receiver will *not* see, and the receiver sees
    /// every mutation after it. The snapshot arrives independently of the
    /// next periodic tick.
    pub fn subscribe(&self) -> (VehicleState, broadcast::Receiver<VehicleState>) {
        let state = self.state.read().unwrap();
        let rx = self.broadcast_tx.subscribe();
        (state.vehicle.clone(), rx)
    }

    /// Advance the simulation by one tick.
    ///
    /// While the ignition is on, the motion model perturbs the position and
    /// produces a new speed and heading, and the speed is recorded into the
    /// open trip. While off, the position holds and the speed is forced to
    /// zero. Either way `last_update` moves and a snapshot is broadcast.
    /// This operation cannot fail.
    pub fn tick(&self) {
        let mut guard = self.state.write().unwrap();
        let state = &mut *guard;
        let moving = state.vehicle.ignition_on;

        let update = state.motion.advance(
            state.vehicle.position,
            state.vehicle.heading_degrees,
            moving,
        );

        state.vehicle.position = update.position;
        state.vehicle.speed_kmh = if moving { update.speed_kmh } else { 0.0 };
        state.vehicle.heading_degrees = update.heading_degrees;
        state.vehicle.is_moving = moving;
        state.vehicle.last_update = Utc::now();

        if moving {
            state.ledger.record_sample(state.vehicle.speed_kmh);
        }

        let snapshot = state.vehicle.clone();
        debug_assert!(snapshot.is_consistent());
        let _ = self.broadcast_tx.send(snapshot);
    }

    /// Flip the ignition and return the resulting state.
    ///
    /// Switching on opens a trip; a trip somehow already open is logged and
    /// left untouched rather than crashing. Switching off closes the open
    /// trip (a no-op when there is none, e.g. at startup) and hands the
    /// completed record to the store once the lock is released. The snapshot
    /// broadcast happens after the ledger transition settles, so subscribers
    /// never observe a half-updated trip alongside the new flag.
    pub fn toggle_ignition(&self) -> bool {
        let (ignition_on, completed) = {
            let mut state = self.state.write().unwrap();
            let now = Utc::now();
            let ignition_on = !state.vehicle.ignition_on;
            let position = state.vehicle.position;
            let vehicle_id = state.vehicle.vehicle_id.clone();

            let mut completed: Option<Trip> = None;
            if ignition_on {
                match state.ledger.start(position, now) {
                    Ok(trip_id) => {
                        info!(vehicle_id = %vehicle_id, trip_id = %trip_id, "Trip started");
                    }
                    Err(e) => {
                        // Unreachable via the single ignition flag; guard
                        // against re-entrancy without wedging the engine.
                        warn!(vehicle_id = %vehicle_id, error = %e, "Trip already active, keeping it");
                    }
                }
            } else {
                completed = state.ledger.end(position, now);
                match &completed {
                    Some(trip) => {
                        info!(
                            vehicle_id = %vehicle_id,
                            trip_id = %trip.id,
                            distance_km = trip.distance,
                            duration_min = trip.duration,
                            "Trip completed"
                        );
                    }
                    None => {
                        info!(vehicle_id = %vehicle_id, "Ignition off with no active trip");
                    }
                }
            }

            state.vehicle.ignition_on = ignition_on;
            state.vehicle.is_moving = ignition_on;
            if !ignition_on {
                state.vehicle.speed_kmh = 0.0;
            }
            state.vehicle.last_update = now;

            let snapshot = state.vehicle.clone();
            debug_assert!(snapshot.is_consistent());
            let _ = self.broadcast_tx.send(snapshot);

            (ignition_on, completed)
        };

        if let Some(trip) = completed {
            self.persist(trip);
        }

        ignition_on
    }

    /// Hand a completed trip to the store, fire-and-forget.
    ///
    /// Runs on a blocking task when a tokio runtime is present, inline
    /// otherwise (tests, synchronous callers). Failures are reported, never
    /// propagated.
    fn persist(&self, trip: Trip) {
        let store = Arc::clone(&self.store);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || save_trip(&*store, &trip));
            }
            Err(_) => save_trip(&*store, &trip),
        }
    }
}

fn save_trip(store: &dyn TripStore, trip: &Trip) {
    if let Err(e) = store.insert(trip) {
        error!(trip_id = %trip.id, error = %e, "Failed to persist completed trip");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTripStore, StoreError};
    use crate::trip::TripStatus;

    fn make_engine() -> (Arc<VehicleEngine>, Arc<MemoryTripStore>) {
        let store = Arc::new(MemoryTripStore::new());
        let engine = Arc::new(VehicleEngine::new(
            &SimulationConfig::default(),
            Arc::clone(&store) as Arc<dyn TripStore>,
        ));
        (engine, store)
    }

    #[test]
    fn test_initial_state_is_parked() {
        let (engine, _store) = make_engine();
        let state = engine.snapshot();

        assert!(!state.ignition_on);
        assert!(!state.is_moving);
        assert_eq!(state.speed_kmh, 0.0);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_moving_tracks_ignition_across_toggles() {
        let (engine, _store) = make_engine();

        for _ in 0..5 {
            engine.toggle_ignition();
            let state = engine.snapshot();
            assert_eq!(state.is_moving, state.ignition_on);
            assert!(state.is_consistent());
        }
    }

    #[test]
    fn test_toggle_returns_resulting_state() {
        let (engine, _store) = make_engine();

        assert!(engine.toggle_ignition());
        assert!(engine.ignition_on());
        assert!(!engine.toggle_ignition());
        assert!(!engine.ignition_on());
    }

    #[test]
    fn test_toggle_on_opens_single_trip() {
        let (engine, _store) = make_engine();

        engine.toggle_ignition();
        let first = engine.active_trip_id();
        assert!(first.is_some());

        // Still the same single trip after ticks
        engine.tick();
        engine.tick();
        assert_eq!(engine.active_trip_id(), first);
    }

    #[test]
    fn test_tick_while_parked_holds_position() {
        let (engine, _store) = make_engine();
        let before = engine.snapshot();

        engine.tick();

        let after = engine.snapshot();
        assert_eq!(after.position, before.position);
        assert_eq!(after.speed_kmh, 0.0);
        assert!(!after.is_moving);
        assert!(after.last_update >= before.last_update);
    }

    #[test]
    fn test_tick_while_driving_moves_and_samples() {
        let (engine, store) = make_engine();

        engine.toggle_ignition();
        engine.tick();

        let state = engine.snapshot();
        assert!(state.is_moving);
        assert!(state.speed_kmh >= 20.0 && state.speed_kmh <= 80.0);

        // The recorded sample surfaces in the completed trip's metrics
        engine.toggle_ignition();
        let trips = store.completed_trips().unwrap();
        assert_eq!(trips.len(), 1);
        assert!(trips[0].max_speed >= 20);
    }

    #[test]
    fn test_immediate_on_off_pair_completes_empty_trip() {
        let (engine, store) = make_engine();
        let (_, mut rx) = engine.subscribe();

        // Ignition on then off before any tick
        assert!(engine.toggle_ignition());
        assert!(!engine.toggle_ignition());

        let on_update = rx.try_recv().expect("on broadcast");
        assert!(on_update.ignition_on);
        let off_update = rx.try_recv().expect("off broadcast");
        assert!(!off_update.ignition_on);
        assert_eq!(off_update.position, on_update.position);

        // The zero-sample trip still records, with zeroed metrics
        let trips = store.completed_trips().unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].max_speed, 0);
        assert_eq!(trips[0].avg_speed, 0);
    }

    #[test]
    fn test_completed_trip_lands_in_store() {
        let (engine, store) = make_engine();

        engine.toggle_ignition();
        engine.tick();
        engine.toggle_ignition();

        let trips = store.completed_trips().unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].status, TripStatus::Completed);
        assert_eq!(trips[0].vehicle_id, "vehicle-1-demo");
        assert!(trips[0].end_time.is_some());
    }

    #[test]
    fn test_at_most_one_active_trip() {
        let (engine, store) = make_engine();

        engine.toggle_ignition();
        engine.toggle_ignition();
        engine.toggle_ignition();

        // Two toggles completed one trip, the third opened a new one
        assert_eq!(store.completed_trips().unwrap().len(), 1);
        assert!(engine.active_trip_id().is_some());
    }

    #[test]
    fn test_subscriber_gets_immediate_snapshot() {
        let (engine, _store) = make_engine();
        engine.toggle_ignition();
        engine.tick();

        let (snapshot, mut rx) = engine.subscribe();

        // The immediate snapshot matches current state and nothing is
        // queued until the next mutation
        assert_eq!(snapshot, engine.snapshot());
        assert!(rx.try_recv().is_err());

        engine.tick();
        let update = rx.try_recv().expect("tick should broadcast");
        assert!(update.last_update >= snapshot.last_update);
    }

    #[test]
    fn test_broadcast_order_is_chronological() {
        let (engine, _store) = make_engine();
        let (snapshot, mut rx) = engine.subscribe();

        engine.toggle_ignition();
        engine.tick();
        engine.tick();
        engine.toggle_ignition();

        let mut last = snapshot.last_update;
        let mut seen = 0;
        while let Ok(update) = rx.try_recv() {
            assert!(update.last_update >= last);
            last = update.last_update;
            seen += 1;
        }
        assert_eq!(seen, 4);
    }

    /// Store that always fails, for exercising the persistence error path.
    struct FailingStore;

    impl TripStore for FailingStore {
        fn insert(&self, _trip: &Trip) -> Result<(), StoreError> {
            Err(StoreError::Lock)
        }

        fn completed_trips(&self) -> Result<Vec<Trip>, StoreError> {
            Err(StoreError::Lock)
        }
    }

    #[test]
    fn test_store_failure_does_not_wedge_the_engine() {
        let engine = VehicleEngine::new(&SimulationConfig::default(), Arc::new(FailingStore));

        engine.toggle_ignition();
        engine.tick();
        // The save fails, but the toggle still reports the resulting state
        // and the ledger returns to idle
        assert!(!engine.toggle_ignition());
        assert!(engine.active_trip_id().is_none());
        assert!(engine.snapshot().is_consistent());

        // A fresh trip can still be opened
        assert!(engine.toggle_ignition());
        assert!(engine.active_trip_id().is_some());
    }
}
