//! `GeoJSON` geometry to ring conversion.

use geojson::{Geometry, Value};
use lot_measure_parcel_models::{LatLng, ParcelFeature, Ring};

/// Flattens a `Polygon` or `MultiPolygon` into its outer rings.
///
/// Only the first ring of each polygon part is kept. Positions are
/// swapped from `GeoJSON` `[lng, lat]` to [`LatLng`]. Any other geometry
/// type yields an empty list.
#[must_use]
pub fn flatten(geometry: &Geometry) -> Vec<Ring> {
    match &geometry.value {
        Value::Polygon(rings) => rings
            .first()
            .map(|r| ring_from_positions(r))
            .into_iter()
            .collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first())
            .map(|r| ring_from_positions(r))
            .collect(),
        _ => {
            log::debug!("Ignoring non-polygonal parcel geometry");
            Vec::new()
        }
    }
}

/// Flattens a feature's geometry. Features without geometry give no rings.
#[must_use]
pub fn flatten_feature(feature: &ParcelFeature) -> Vec<Ring> {
    feature.geometry.as_ref().map(flatten).unwrap_or_default()
}

/// Positions with fewer than two ordinates are dropped.
fn ring_from_positions(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .filter_map(|pos| match pos.as_slice() {
            [lng, lat, ..] => Some(LatLng::new(*lat, *lng)),
            _ => None,
        })
        .collect()
}
