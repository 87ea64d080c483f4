//! Trip storage abstraction.
//!
//! The engine hands completed trips to a [`TripStore`] and never looks at
//! them again; the store owns durability and the completed-trip query. Two
//! implementations ship with the crate:
//!
//! - [`MemoryTripStore`] - in-process, for tests and ephemeral runs
//! - [`JsonlTripStore`] - append-only JSON-lines file
//!
//! The query contract distinguishes "no trips yet" (`Ok` with an empty list)
//! from "query failed" (`Err`), so callers never mistake a broken store for
//! an empty one.

mod jsonl;
mod memory;

pub use jsonl::JsonlTripStore;
pub use memory::MemoryTripStore;

use thiserror::Error;

use crate::trip::Trip;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure reading or writing the backing file
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A trip record could not be encoded or decoded
    #[error("malformed trip record: {0}")]
    Codec(#[from] serde_json::Error),

    /// The store's internal lock was poisoned
    #[error("failed to acquire store lock")]
    Lock,
}

/// Durable store for trip records.
///
/// Implementations must be safe to share across the engine's execution
/// paths; inserts arrive from a detached persistence task while queries come
/// from request handlers.
pub trait TripStore: Send + Sync {
    /// Persist a completed trip.
    fn insert(&self, trip: &Trip) -> Result<(), StoreError>;

    /// All completed trips, ordered by start time descending (newest first).
    fn completed_trips(&self) -> Result<Vec<Trip>, StoreError>;
}
