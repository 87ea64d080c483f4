//! Trip records and the ignition-driven trip lifecycle.
//!
//! A trip is one ignition-on/ignition-off cycle. The [`TripLedger`] owns the
//! two-state lifecycle (idle / one active trip) and derives the completed
//! trip's metrics from the samples collected while it was active:
//!
//! - `distance` - great-circle distance between start and end position
//!   (straight line, deliberately not a path integral)
//! - `duration` - whole minutes, rounded half-up
//! - `max_speed` / `avg_speed` - integers derived from the speed samples,
//!   both 0 for a trip that ended before any sample was recorded

mod ledger;

pub use ledger::{LedgerError, TripLedger};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Trip is open; the vehicle's ignition is on.
    Active,
    /// Trip has ended and its metrics are final.
    Completed,
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A recorded trip, in the shape the storage collaborator accepts.
///
/// While a trip is active, `end_time`, `end_lat` and `end_lon` are absent and
/// the metric fields are zero. Once completed the record never changes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique trip id (time-based token, unique within a process lifetime).
    pub id: String,

    /// Vehicle this trip belongs to.
    pub vehicle_id: String,

    /// When the ignition was switched on.
    pub start_time: DateTime<Utc>,

    /// When the ignition was switched off; absent while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Latitude at trip start.
    pub start_lat: f64,

    /// Longitude at trip start.
    pub start_lon: f64,

    /// Latitude at trip end; absent while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,

    /// Longitude at trip end; absent while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lon: Option<f64>,

    /// Great-circle distance between start and end position, km.
    pub distance: f64,

    /// Trip duration in whole minutes, rounded half-up.
    pub duration: i64,

    /// Highest recorded speed, km/h.
    pub max_speed: u32,

    /// Mean recorded speed, km/h, rounded half-up.
    pub avg_speed: u32,

    /// Lifecycle status.
    pub status: TripStatus,
}
