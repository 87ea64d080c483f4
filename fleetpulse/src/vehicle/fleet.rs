//! Vehicle-id keyed engine registry.
//!
//! Only one vehicle is populated today, but keying engines by id from the
//! start means multi-vehicle support is a registration away rather than a
//! rewrite.

use std::sync::Arc;

use dashmap::DashMap;

use super::engine::VehicleEngine;

/// Registry of vehicle engines, keyed by vehicle id.
#[derive(Default)]
pub struct Fleet {
    engines: DashMap<String, Arc<VehicleEngine>>,
}

impl Fleet {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under its vehicle id, replacing any previous
    /// engine for that id. Returns the engine for chaining.
    pub fn register(&self, engine: Arc<VehicleEngine>) -> Arc<VehicleEngine> {
        self.engines
            .insert(engine.vehicle_id(), Arc::clone(&engine));
        engine
    }

    /// Look up an engine by vehicle id.
    pub fn engine(&self, vehicle_id: &str) -> Option<Arc<VehicleEngine>> {
        self.engines.get(vehicle_id).map(|e| Arc::clone(e.value()))
    }

    /// Advance every registered engine by one tick.
    pub fn tick_all(&self) {
        for entry in self.engines.iter() {
            entry.value().tick();
        }
    }

    /// Number of registered vehicles.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether the fleet has no vehicles.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Ids of all registered vehicles.
    pub fn vehicle_ids(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.key().clone()).collect()
    }
}
