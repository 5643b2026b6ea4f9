//! Lot area for the "lot square feet" figure.

use lot_measure_geometry::{GeometryOps, flatten_feature, sq_m_to_sq_ft};
use lot_measure_parcel_models::ParcelFeature;

/// Lot size of a parcel in square feet.
///
/// Prefers the authoritative `properties.areaSqFt` when present and
/// finite; otherwise sums the spherical area of every flattened ring. No rings is `0.0`.
pub fn lot_sq_ft<O: GeometryOps + ?Sized>(feature: &ParcelFeature, ops: &O) -> f64 {
    if let Some(area) = feature.area_sq_ft_property() {
        return area;
    }
    let sq_m = flatten_feature(feature)
        .iter()
        .map(|ring| ops.ring_area(ring))
        .fold(0.0, |acc, area| acc + area);
    sq_m_to_sq_ft(sq_m)
}
