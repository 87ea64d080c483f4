//! Fleetpulse CLI - command-line interface
//!
//! This binary provides a command-line interface to the Fleetpulse library:
//! a scripted simulation session and a completed-trip listing.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::{drive, trips};

#[derive(Parser)]
#[command(name = "fleetpulse")]
#[command(about = "Vehicle telemetry simulation and trip ledger", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulated driving session: ignition on, a number of ticks,
    /// ignition off, trip saved
    Drive(drive::DriveArgs),
    /// List completed trips from a trip store file, newest first
    Trips(trips::TripsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Drive(args) => drive::run(args),
        Command::Trips(args) => trips::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
