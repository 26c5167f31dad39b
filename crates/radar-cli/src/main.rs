//! Administrative entry point for Issue Radar routing.
//!
//! The reporting and triage apps own ticket creation; this binary covers
//! the operator side: backfilling unrouted tickets, spot-checking a
//! coordinate, and refreshing an organization's territory bounds.

use anyhow::Result;
use clap::{Parser, Subcommand};
use radar_core::Coordinate;
use radar_routing::{refresh_bounds, AssignmentResolver, BackfillJob};
use radar_store::SqliteStore;
use radar_utils::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "radar", version, about = "Issue Radar territory administration")]
struct Cli {
    /// Path to a YAML config file (falls back to RADAR_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Route all unrouted tickets against current territories
    Backfill,
    /// Resolve a single coordinate to an organization
    Resolve {
        /// Latitude in degrees
        #[arg(long)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long)]
        lng: f64,
    },
    /// Recompute and persist an organization's territory bounds
    Bounds {
        /// Owner id of the organization document
        #[arg(long)]
        org: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path.clone())?,
        None => Config::from_env()?,
    };
    radar_utils::logging::init(&config.logging.level)?;

    let store = SqliteStore::connect(&config.database.url, config.database.max_connections).await?;

    match cli.command {
        Command::Backfill => {
            let job = BackfillJob::new(store.clone(), store);
            let summary = job.run().await?;
            println!(
                "Backfill complete. Updated {} of {} tickets ({} already routed, {} unrouted, {} failed).",
                summary.updated, summary.scanned, summary.skipped, summary.unrouted, summary.failed
            );
        }
        Command::Resolve { lat, lng } => {
            let resolver = AssignmentResolver::new(store);
            match resolver.resolve(Coordinate::new(lat, lng)).await? {
                Some(org_code) => println!("{org_code}"),
                None => println!("unrouted"),
            }
        }
        Command::Bounds { org } => match refresh_bounds(&store, &org).await? {
            Some(b) => println!(
                "Bounds updated: lat [{}, {}], lng [{}, {}]",
                b.min_lat, b.max_lat, b.min_lng, b.max_lng
            ),
            None => println!("No territory drawn; bounds unchanged."),
        },
    }

    Ok(())
}
