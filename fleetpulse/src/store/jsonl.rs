//! JSON-lines file trip store.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{StoreError, TripStore};
use crate::trip::{Trip, TripStatus};

/// Trip store backed by an append-only JSON-lines file.
///
/// Each insert appends one JSON object per line, so the file stays readable
/// with standard text tooling and a crashed process loses at most the record
/// being written. A missing file means no trips have been recorded yet and
/// reads as an empty store; a file with an unparsable line is an error, not
/// an empty result.
#[derive(Debug)]
pub struct JsonlTripStore {
    path: PathBuf,
    // Serializes appends so concurrent inserts cannot interleave lines
    write_lock: Mutex<()>,
}

impl JsonlTripStore {
    /// Create a store writing to the given file path.
    ///
    /// The file is created lazily on first insert.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TripStore for JsonlTripStore {
    fn insert(&self, trip: &Trip) -> Result<(), StoreError> {
        let line = serde_json::to_string(trip)?;

        let _guard = self.write_lock.lock().map_err(|_| StoreError::Lock)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn completed_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            // No file yet means no trips yet, not a failure
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut completed = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let trip: Trip = serde_json::from_str(&line)?;
            if trip.status == TripStatus::Completed {
                completed.push(trip);
            }
        }

        completed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::trip::TripLedger;
    use chrono::{Duration, Utc};

    fn completed_trip(offset_secs: i64) -> Trip {
        let mut ledger = TripLedger::new("vehicle-1-demo");
        let position = Coordinate::new(12.9716, 77.5946).unwrap();
        let t0 = Utc::now() + Duration::seconds(offset_secs);

        ledger.start(position, t0).unwrap();
        ledger.end(position, t0 + Duration::seconds(45)).unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonlTripStore {
        JsonlTripStore::new(dir.path().join("trips.jsonl"))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.completed_trips().unwrap().is_empty());
    }

    #[test]
    fn test_insert_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let trip = completed_trip(0);

        store.insert(&trip).unwrap();

        let trips = store.completed_trips().unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0], trip);
    }

    #[test]
    fn test_query_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let older = completed_trip(-300);
        let newer = completed_trip(0);

        store.insert(&older).unwrap();
        store.insert(&newer).unwrap();

        let trips = store.completed_trips().unwrap();
        assert_eq!(trips[0].id, newer.id);
        assert_eq!(trips[1].id, older.id);
    }

    #[test]
    fn test_corrupt_line_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.insert(&completed_trip(0)).unwrap();

        std::fs::write(store.path(), "not json\n").unwrap();

        assert!(matches!(
            store.completed_trips(),
            Err(StoreError::Codec(_))
        ));
    }

    #[test]
    fn test_reopened_store_sees_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.jsonl");

        let trip = completed_trip(0);
        JsonlTripStore::new(&path).insert(&trip).unwrap();

        let reopened = JsonlTripStore::new(&path);
        assert_eq!(reopened.completed_trips().unwrap(), vec![trip]);
    }
}
