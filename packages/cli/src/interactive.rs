//! Menu-driven mode, entered when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use lot_measure_parcel_models::LatLng;

use crate::commands;

enum Action {
    FetchAddress,
    FetchLocation,
    Select,
    Export,
    Serve,
}

impl Action {
    const ALL: &[Self] = &[
        Self::FetchAddress,
        Self::FetchLocation,
        Self::Select,
        Self::Export,
        Self::Serve,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::FetchAddress => "Look up parcels by address",
            Self::FetchLocation => "Look up parcels by coordinate",
            Self::Select => "Pick the main parcel from a saved response",
            Self::Export => "Export a saved response as GeoJSON",
            Self::Serve => "Start server",
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lot Measure");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::FetchAddress => {
            let address: String = Input::new().with_prompt("Address").interact_text()?;
            commands::fetch(Some(&address), None, None).await?;
        }
        Action::FetchLocation => {
            let point = prompt_point("Parcel")?;
            commands::fetch(None, Some(point.lat), Some(point.lng)).await?;
        }
        Action::Select => {
            let input = prompt_path("Response file", "parcels.json")?;
            let focus = prompt_optional_point("Searched point")?;
            let click = prompt_optional_point("Corrective click")?;
            commands::select(&input, focus, click).await?;
        }
        Action::Export => {
            let input = prompt_path("Response file", "parcels.json")?;
            let focus = prompt_optional_point("Searched point")?;
            let output = prompt_path("Output file", "lot-measure.geojson")?;
            commands::export(&input, focus, &output).await?;
        }
        Action::Serve => commands::serve(true).await?,
    }

    Ok(())
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}

fn prompt_point(prompt: &str) -> Result<LatLng, dialoguer::Error> {
    let lat: f64 = Input::new()
        .with_prompt(format!("{prompt} latitude"))
        .interact_text()?;
    let lng: f64 = Input::new()
        .with_prompt(format!("{prompt} longitude"))
        .interact_text()?;
    Ok(LatLng::new(lat, lng))
}

/// An empty answer means no point.
fn prompt_optional_point(prompt: &str) -> Result<Option<LatLng>, dialoguer::Error> {
    let lat: String = Input::new()
        .with_prompt(format!("{prompt} latitude (blank to skip)"))
        .allow_empty(true)
        .interact_text()?;
    let Ok(lat) = lat.trim().parse::<f64>() else {
        return Ok(None);
    };
    let lng: f64 = Input::new()
        .with_prompt(format!("{prompt} longitude"))
        .interact_text()?;
    Ok(Some(LatLng::new(lat, lng)))
}
