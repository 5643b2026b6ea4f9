#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the lot-measure toolchain.
//!
//! ```text
//! lot_measure fetch --address "1 Main St, Springfield"
//! lot_measure fetch --lat 37.77 --lng -122.42
//! lot_measure select --input parcels.json --lat 37.77 --lng -122.42 [--click-lat .. --click-lng ..]
//! lot_measure export --input parcels.json [--lat .. --lng ..] --output lot.geojson
//! lot_measure serve
//! ```
//!
//! Running `lot_measure` with no subcommand enters interactive mode.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lot_measure_parcel_models::LatLng;

#[derive(Parser)]
#[command(name = "lot_measure", about = "Look up parcels and measure lots")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch parcel boundaries and print them as a `FeatureCollection`
    Fetch {
        /// Street address to look up
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        address: Option<String>,
        /// Latitude of a point in the parcel
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of a point in the parcel
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Pick the main parcel from a saved lookup response
    Select {
        /// JSON file holding the lookup response
        #[arg(long)]
        input: PathBuf,
        /// Latitude of the searched point
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the searched point
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Latitude of a corrective click
        #[arg(long, requires = "click_lng", allow_hyphen_values = true)]
        click_lat: Option<f64>,
        /// Longitude of a corrective click
        #[arg(long, requires = "click_lat", allow_hyphen_values = true)]
        click_lng: Option<f64>,
    },
    /// Write the selected parcel and its neighbors as a `GeoJSON` file
    Export {
        /// JSON file holding the lookup response
        #[arg(long)]
        input: PathBuf,
        /// Latitude of the searched point
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the searched point
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Destination file
        #[arg(long, default_value = "lot-measure.geojson")]
        output: PathBuf,
    },
    /// Start the HTTP API server
    Serve,
}

fn point(lat: Option<f64>, lng: Option<f64>) -> Option<LatLng> {
    Some(LatLng::new(lat?, lng?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Fetch { address, lat, lng } => {
            commands::fetch(address.as_deref(), lat, lng).await?;
        }
        Commands::Select {
            input,
            lat,
            lng,
            click_lat,
            click_lng,
        } => {
            commands::select(&input, point(lat, lng), point(click_lat, click_lng)).await?;
        }
        Commands::Export {
            input,
            lat,
            lng,
            output,
        } => {
            commands::export(&input, point(lat, lng), &output).await?;
        }
        Commands::Serve => commands::serve(false).await?,
    }

    Ok(())
}
