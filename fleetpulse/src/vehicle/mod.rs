//! Vehicle telemetry engine.
//!
//! This module is the single source of truth for a vehicle's live state and
//! the lifecycle of its trips.
//!
//! # Architecture
//!
//! - [`state`] - `VehicleState`, the snapshot broadcast to subscribers
//! - [`motion`] - `MotionModel`, the pluggable position-update strategy,
//!   and the default `RandomWalk` simulation
//! - [`engine`] - `VehicleEngine`, owner of state + trip ledger behind one
//!   lock; entry point for ticks and ignition toggles
//! - [`simulator`] - `SimulationDaemon`, the fixed-period background tick
//! - [`fleet`] - `Fleet`, the vehicle-id keyed engine registry
//!
//! # Control Flow
//!
//! The simulation daemon ticks each registered engine on a fixed period;
//! a tick advances the position while the ignition is on, records a speed
//! sample into the open trip and broadcasts the new snapshot. An ignition
//! toggle flips the flag, opens or closes the trip, broadcasts, and - on
//! close - hands the completed trip to the store on a detached task.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetpulse::config::SimulationConfig;
//! use fleetpulse::store::MemoryTripStore;
//! use fleetpulse::vehicle::{Fleet, SimulationDaemon, VehicleEngine};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = Arc::new(MemoryTripStore::new());
//! let engine = Arc::new(VehicleEngine::new(&SimulationConfig::default(), store));
//!
//! let fleet = Arc::new(Fleet::new());
//! fleet.register(Arc::clone(&engine));
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(SimulationDaemon::new(Arc::clone(&fleet)).run(shutdown.clone()));
//!
//! engine.toggle_ignition(); // trip starts, ticks accumulate samples
//! ```

mod engine;
mod fleet;
mod motion;
mod simulator;
mod state;

pub use engine::VehicleEngine;
pub use fleet::Fleet;
pub use motion::{MotionModel, MotionUpdate, RandomWalk};
pub use simulator::SimulationDaemon;
pub use state::VehicleState;
