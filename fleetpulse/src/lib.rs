//! Fleetpulse - vehicle telemetry simulation and trip ledger
//!
//! This library tracks a vehicle's live position and ignition state,
//! simulates motion while the ignition is on, and records each
//! ignition-on/ignition-off cycle as a completed trip with derived metrics
//! (distance, duration, average/maximum speed).
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetpulse::config::SimulationConfig;
//! use fleetpulse::store::MemoryTripStore;
//! use fleetpulse::vehicle::VehicleEngine;
//!
//! let store = Arc::new(MemoryTripStore::new());
//! let engine = Arc::new(VehicleEngine::new(&SimulationConfig::default(), store));
//!
//! // Subscribe to live state; the current snapshot arrives immediately
//! let (snapshot, mut rx) = engine.subscribe();
//!
//! // Start a trip
//! let ignition_on = engine.toggle_ignition();
//! assert!(ignition_on);
//! ```

pub mod alert;
pub mod auth;
pub mod config;
pub mod geo;
pub mod logging;
pub mod store;
pub mod trip;
pub mod vehicle;

/// Version of the Fleetpulse library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
