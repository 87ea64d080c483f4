//! Drive command - run a scripted simulation session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use fleetpulse::config::SimulationConfig;
use fleetpulse::store::{JsonlTripStore, TripStore};
use fleetpulse::vehicle::{Fleet, RandomWalk, SimulationDaemon, VehicleEngine, VehicleState};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;

/// Arguments for the drive command.
#[derive(Debug, Args)]
pub struct DriveArgs {
    /// Trip store file (JSON lines)
    #[arg(long, default_value = "trips.jsonl")]
    pub store: PathBuf,

    /// Vehicle identifier
    #[arg(long, default_value = "vehicle-1-demo")]
    pub vehicle: String,

    /// Number of simulation ticks to drive for
    #[arg(long, default_value_t = 5)]
    pub ticks: u32,

    /// Tick period in milliseconds (default: 3000, the live period)
    #[arg(long, default_value_t = 3000)]
    pub interval_ms: u64,

    /// Seed for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the drive command.
pub fn run(args: DriveArgs) -> Result<(), CliError> {
    let _logging = fleetpulse::logging::init_logging(
        fleetpulse::logging::default_log_dir(),
        fleetpulse::logging::default_log_file(),
    )
    .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    info!("Fleetpulse v{}", fleetpulse::VERSION);

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(drive_session(args))
}

async fn drive_session(args: DriveArgs) -> Result<(), CliError> {
    let config = SimulationConfig::new(args.vehicle.clone())
        .with_tick_interval(Duration::from_millis(args.interval_ms));

    let store: Arc<dyn TripStore> = Arc::new(JsonlTripStore::new(&args.store));
    let motion = match args.seed {
        Some(seed) => Box::new(RandomWalk::with_seed(&config, seed)),
        None => Box::new(RandomWalk::from_config(&config)),
    };
    let engine = Arc::new(VehicleEngine::with_motion_model(
        &config,
        Arc::clone(&store),
        motion,
    ));

    let fleet = Arc::new(Fleet::new());
    fleet.register(Arc::clone(&engine));

    let shutdown = CancellationToken::new();
    let daemon = SimulationDaemon::new(Arc::clone(&fleet)).with_interval(config.tick_interval);
    let daemon_handle = tokio::spawn(daemon.run(shutdown.clone()));

    // A new subscriber receives the current snapshot immediately
    let (snapshot, mut rx) = engine.subscribe();
    print_snapshot(&snapshot);

    println!();
    println!("Ignition on - driving for {} ticks...", args.ticks);
    engine.toggle_ignition();

    let mut moving_updates = 0;
    while moving_updates < args.ticks {
        match rx.recv().await {
            Ok(update) => {
                print_snapshot(&update);
                if update.is_moving && update.speed_kmh > 0.0 {
                    moving_updates += 1;
                }
            }
            Err(_) => break,
        }
    }

    println!();
    println!("Ignition off - completing trip");
    engine.toggle_ignition();

    shutdown.cancel();
    let _ = daemon_handle.await;

    // Persistence is fire-and-forget; give the detached save a moment
    let trip = {
        let mut found = None;
        for _ in 0..50 {
            let trips = store.completed_trips()?;
            if let Some(trip) = trips.into_iter().next() {
                found = Some(trip);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        found
    };

    match trip {
        Some(trip) => {
            println!();
            println!("Trip {} completed:", trip.id);
            println!("  Distance:  {:.2} km", trip.distance);
            println!("  Duration:  {} min", trip.duration);
            println!("  Max speed: {} km/h", trip.max_speed);
            println!("  Avg speed: {} km/h", trip.avg_speed);
            println!();
            println!("Saved to {}", args.store.display());
        }
        None => {
            println!("Trip record not yet visible in {}", args.store.display());
        }
    }

    Ok(())
}

fn print_snapshot(state: &VehicleState) {
    println!(
        "[{}] pos=({:.5}, {:.5}) speed={:>5.1} km/h heading={:>5.1} ignition={} moving={}",
        state.last_update.format("%H:%M:%S"),
        state.position.latitude(),
        state.position.longitude(),
        state.speed_kmh,
        state.heading_degrees,
        state.ignition_on,
        state.is_moving,
    );
}
