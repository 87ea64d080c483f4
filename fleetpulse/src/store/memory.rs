//! In-memory trip store.

use std::sync::RwLock;

use super::{StoreError, TripStore};
use crate::trip::{Trip, TripStatus};

/// Trip store backed by a process-local vector.
///
/// Useful for tests and ephemeral simulation runs where durability does not
/// matter. Records are kept in insertion order; the completed-trip query
/// sorts newest-first like every other store.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    trips: RwLock<Vec<Trip>>,
}

impl MemoryTripStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.trips.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TripStore for MemoryTripStore {
    fn insert(&self, trip: &Trip) -> Result<(), StoreError> {
        let mut trips = self.trips.write().map_err(|_| StoreError::Lock)?;
        trips.push(trip.clone());
        Ok(())
    }

    fn completed_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let trips = self.trips.read().map_err(|_| StoreError::Lock)?;
        let mut completed: Vec<Trip> = trips
            .iter()
            .filter(|t| t.status == TripStatus::Completed)
            .cloned()
            .collect();
        completed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(completed)
    }
}
