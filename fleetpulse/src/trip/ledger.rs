//! Trip ledger - the idle/active trip state machine.
//!
//! The ledger holds at most one active trip per vehicle. `start` opens a
//! trip and clears the speed sample set; `record_sample` appends to it while
//! active; `end` consumes the samples exactly once, derives the trip metrics
//! and returns the completed, immutable record.
//!
//! The ledger itself is not thread-safe; the owning engine serializes access
//! through its state lock.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Trip, TripStatus};
use crate::geo::{haversine_km, Coordinate};

/// Errors from invalid trip transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// `start` was called while a trip is already open.
    #[error("trip {0} is already active")]
    TripAlreadyActive(String),
}

/// The one trip currently open, plus its accumulating sample set.
#[derive(Debug)]
struct ActiveTrip {
    id: String,
    start_time: DateTime<Utc>,
    start_position: Coordinate,
    samples: Vec<f64>,
}

/// Per-vehicle trip lifecycle state machine.
#[derive(Debug)]
pub struct TripLedger {
    vehicle_id: String,
    active: Option<ActiveTrip>,
}

impl TripLedger {
    /// Create an idle ledger for the given vehicle.
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            active: None,
        }
    }

    /// Whether a trip is currently open.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the open trip, if any.
    pub fn active_trip_id(&self) -> Option<&str> {
        self.active.as_ref().map(|t| t.id.as_str())
    }

    /// Open a new trip at the given position and time.
    ///
    /// Generates a time-based trip id, records the start position/time and
    /// clears the sample set. Returns the new trip id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TripAlreadyActive`] if a trip is already open.
    /// The single ignition flag makes this unreachable in normal operation,
    /// but the guard keeps a re-entrant caller from silently discarding an
    /// open trip.
    pub fn start(
        &mut self,
        position: Coordinate,
        time: DateTime<Utc>,
    ) -> Result<String, LedgerError> {
        if let Some(active) = &self.active {
            return Err(LedgerError::TripAlreadyActive(active.id.clone()));
        }

        let id = format!("trip-{}", time.timestamp_millis());
        self.active = Some(ActiveTrip {
            id: id.clone(),
            start_time: time,
            start_position: position,
            samples: Vec::new(),
        });
        Ok(id)
    }

    /// Append a speed sample to the open trip.
    ///
    /// Ignored while idle; samples only exist in the context of a trip.
    pub fn record_sample(&mut self, speed_kmh: f64) {
        if let Some(active) = &mut self.active {
            active.samples.push(speed_kmh);
        }
    }

    /// Close the open trip at the given position and time.
    ///
    /// Computes the trip metrics, consumes the sample set and returns the
    /// completed record. Returns `None` while idle: switching the ignition
    /// off with no open trip (e.g. at startup) is valid and not an error.
    pub fn end(&mut self, position: Coordinate, time: DateTime<Utc>) -> Option<Trip> {
        let active = self.active.take()?;

        let (max_speed, avg_speed) = speed_stats(&active.samples);
        Some(Trip {
            id: active.id,
            vehicle_id: self.vehicle_id.clone(),
            start_time: active.start_time,
            end_time: Some(time),
            start_lat: active.start_position.latitude(),
            start_lon: active.start_position.longitude(),
            end_lat: Some(position.latitude()),
            end_lon: Some(position.longitude()),
            distance: haversine_km(active.start_position, position),
            duration: duration_minutes(active.start_time, time),
            max_speed,
            avg_speed,
            status: TripStatus::Completed,
        })
    }
}

/// Whole minutes between two instants, rounded half-up.
///
/// `f64::round` rounds half away from zero; durations are non-negative, so
/// this is round-half-up: 9 s -> 0 min, 90 s -> 2 min.
fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds().max(0);
    (seconds as f64 / 60.0).round() as i64
}

/// Max and rounded mean of the sample set; both 0 when empty.
fn speed_stats(samples: &[f64]) -> (u32, u32) {
    if samples.is_empty() {
        return (0, 0);
    }

    let max = samples.iter().fold(f64::MIN, |acc, &s| acc.max(s));
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (max.round() as u32, mean.round() as u32)
}
