//! Subcommand implementations shared by the argument parser and the
//! interactive menu.

use std::path::Path;

use lot_measure_geometry::GeoOps;
use lot_measure_parcel::{
    Measurements, ParcelSession, lot_sq_ft, normalize_payload, session_feature_collection,
    to_feature_collection,
};
use lot_measure_parcel_models::{LatLng, ParcelFeature, SelectionResult};
use lot_measure_precisely::{ParcelQuery, PreciselyClient};

type BoxError = Box<dyn std::error::Error>;

/// Looks up parcels and prints the normalized `FeatureCollection`.
pub async fn fetch(
    address: Option<&str>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<(), BoxError> {
    let query = ParcelQuery::from_params(address, lat, lng)
        .ok_or("Provide --address or both --lat and --lng")?;

    let client = PreciselyClient::from_env()?;
    let upstream = client.fetch(&query).await?;
    if !upstream.is_success() {
        return Err(format!(
            "Parcel API returned status {}: {}",
            upstream.status, upstream.body
        )
        .into());
    }

    let parcels = normalize_payload(&upstream.body);
    log::info!("Fetched {} parcel candidate(s)", parcels.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&to_feature_collection(&parcels))?
    );
    Ok(())
}

/// Resolves the main parcel from a saved response, optionally followed by
/// a corrective click.
pub async fn select(
    input: &Path,
    focus: Option<LatLng>,
    click: Option<LatLng>,
) -> Result<(), BoxError> {
    let mut session = load_session(input, focus).await?;

    let Some(selection) = session.selection() else {
        println!("No parcels found in {}", input.display());
        return Ok(());
    };
    print_selection(session.features(), selection);

    if let Some(click) = click {
        println!();
        println!("After click at ({}, {}):", click.lat, click.lng);
        if let Some(selection) = session.click(click).cloned() {
            print_selection(session.features(), &selection);
        }
    }

    Ok(())
}

/// Writes the selected parcel and its neighbors to `output`.
pub async fn export(input: &Path, focus: Option<LatLng>, output: &Path) -> Result<(), BoxError> {
    let session = load_session(input, focus).await?;
    if session.selection().is_none() {
        return Err(format!("No parcels found in {}", input.display()).into());
    }

    let collection = session_feature_collection(&session, &Measurements::new());
    tokio::fs::write(output, serde_json::to_string_pretty(&collection)?).await?;

    log::info!(
        "Wrote {} feature(s) to {}",
        collection.features.len(),
        output.display()
    );
    println!("Wrote {}", output.display());
    Ok(())
}

/// Starts the API server. The server runs on actix's own runtime, so it
/// is driven from a blocking task.
pub async fn serve(interactive: bool) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                lot_measure_server::interactive::run().await
            } else {
                lot_measure_server::run_server().await
            }
        })
    })
    .await??;
    Ok(())
}

async fn load_session(input: &Path, focus: Option<LatLng>) -> Result<ParcelSession, BoxError> {
    let text = tokio::fs::read_to_string(input).await?;
    let payload: serde_json::Value = serde_json::from_str(&text)?;

    let mut session = ParcelSession::default();
    session.load(normalize_payload(&payload), focus);
    Ok(session)
}

fn print_selection(features: &[ParcelFeature], selection: &SelectionResult) {
    if let Some(tier) = selection.tier {
        println!("Main parcel chosen by: {tier:?}");
    }
    for (index, role) in selection.roles() {
        let Some(feature) = features.get(index) else {
            continue;
        };
        let label = format!("{role:?}");
        let area = lot_sq_ft(feature, &GeoOps);
        println!("  #{index:<3} {label:<8} {area:>12.0} sq ft");
    }
}
