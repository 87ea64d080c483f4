//! Vehicle state snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Complete snapshot of one vehicle at one instant.
///
/// This is the shape broadcast on the real-time channel and handed to a
/// newly attached subscriber. It is a value: cloning it detaches it from the
/// engine, so consumers can hold it without observing later mutations.
///
/// # Invariants
///
/// After any engine operation settles:
///
/// - `is_moving == ignition_on` (there is no separate idling state)
/// - `speed_kmh == 0.0` whenever `is_moving` is false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    /// Stable vehicle identifier.
    pub vehicle_id: String,

    /// Current position.
    pub position: Coordinate,

    /// Current speed in km/h; 0 while not moving.
    pub speed_kmh: f64,

    /// Current heading in degrees (0-360, 0=north).
    pub heading_degrees: f64,

    /// Whether the ignition is on.
    pub ignition_on: bool,

    /// Whether the vehicle is moving; equals `ignition_on` in this model.
    pub is_moving: bool,

    /// When this snapshot was produced.
    pub last_update: DateTime<Utc>,
}

impl VehicleState {
    /// A parked vehicle: ignition off, stationary, heading north.
    pub fn parked(
        vehicle_id: impl Into<String>,
        position: Coordinate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            position,
            speed_kmh: 0.0,
            heading_degrees: 0.0,
            ignition_on: false,
            is_moving: false,
            last_update: now,
        }
    }

    /// Check the snapshot invariants.
    pub fn is_consistent(&self) -> bool {
        self.is_moving == self.ignition_on && (self.is_moving || self.speed_kmh == 0.0)
    }
}
