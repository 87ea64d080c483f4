//! Configuration for the vehicle simulation.
//!
//! Groups the tunable parameters of the simulator into one structure with
//! sensible defaults, so components depend on a config object rather than a
//! pile of raw parameters.

use std::time::Duration;

use crate::geo::Coordinate;

/// Default simulation tick period (3 seconds).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Default per-axis position jitter per tick, in degrees (~25 m at the equator).
pub const DEFAULT_POSITION_JITTER_DEGREES: f64 = 0.000_25;

/// Default simulated speed band in km/h.
pub const DEFAULT_SPEED_RANGE_KMH: (f64, f64) = (20.0, 80.0);

/// Default broadcast channel capacity.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Simulation configuration for one vehicle.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Stable vehicle identifier.
    pub vehicle_id: String,

    /// Position the vehicle starts at.
    pub start_position: Coordinate,

    /// Period of the simulation tick.
    pub tick_interval: Duration,

    /// Maximum per-axis position perturbation per tick, in degrees.
    pub position_jitter_degrees: f64,

    /// Lowest simulated speed while moving, km/h.
    pub min_speed_kmh: f64,

    /// Highest simulated speed while moving, km/h.
    pub max_speed_kmh: f64,

    /// When true, a stopped vehicle keeps its last heading instead of the
    /// historical behavior of re-randomizing it on every tick.
    pub hold_heading_when_stopped: bool,

    /// Capacity of the state broadcast channel.
    pub broadcast_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vehicle_id: "vehicle-1-demo".to_string(),
            start_position: Coordinate::clamped(12.9716, 77.5946),
            tick_interval: DEFAULT_TICK_INTERVAL,
            position_jitter_degrees: DEFAULT_POSITION_JITTER_DEGREES,
            min_speed_kmh: DEFAULT_SPEED_RANGE_KMH.0,
            max_speed_kmh: DEFAULT_SPEED_RANGE_KMH.1,
            hold_heading_when_stopped: false,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration for the given vehicle id.
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            ..Default::default()
        }
    }

    /// Set the starting position.
    pub fn with_start_position(mut self, position: Coordinate) -> Self {
        self.start_position = position;
        self
    }

    /// Set the simulation tick period.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the simulated speed band in km/h.
    pub fn with_speed_range(mut self, min_kmh: f64, max_kmh: f64) -> Self {
        self.min_speed_kmh = min_kmh;
        self.max_speed_kmh = max_kmh;
        self
    }

    /// Keep the last heading while stopped instead of re-randomizing it.
    pub fn with_hold_heading_when_stopped(mut self, hold: bool) -> Self {
        self.hold_heading_when_stopped = hold;
        self
    }
}
