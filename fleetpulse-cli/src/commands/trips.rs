//! Trips command - list completed trips from a store file.

use std::path::PathBuf;

use clap::Args;
use fleetpulse::store::{JsonlTripStore, TripStore};

use crate::error::CliError;

/// Arguments for the trips command.
#[derive(Debug, Args)]
pub struct TripsArgs {
    /// Trip store file (JSON lines)
    #[arg(long, default_value = "trips.jsonl")]
    pub store: PathBuf,

    /// Only show this many trips
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Run the trips command.
pub fn run(args: TripsArgs) -> Result<(), CliError> {
    let store = JsonlTripStore::new(&args.store);

    // A failed query is an error, not an empty listing
    let mut trips = store.completed_trips()?;
    if let Some(limit) = args.limit {
        trips.truncate(limit);
    }

    if trips.is_empty() {
        println!("No completed trips in {}", args.store.display());
        return Ok(());
    }

    println!("Completed trips in {} (newest first):", args.store.display());
    println!();
    for trip in &trips {
        let end_time = trip
            .end_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{}  [{}]", trip.id, trip.vehicle_id);
        println!(
            "  {} -> {}",
            trip.start_time.format("%Y-%m-%d %H:%M:%S"),
            end_time
        );
        println!(
            "  {:.2} km in {} min, max {} km/h, avg {} km/h",
            trip.distance, trip.duration, trip.max_speed, trip.avg_speed
        );
        println!();
    }
    println!("{} trip(s)", trips.len());

    Ok(())
}
