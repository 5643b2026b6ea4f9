//! Spherical ring area and the approximate vertex centroid.

use geo::{ChamberlainDuquetteArea as _, LineString, Polygon};
use lot_measure_parcel_models::{LatLng, Ring};

use crate::SQ_FT_PER_SQ_M;

/// Area enclosed by a ring, in square meters.
///
/// Spherical area on the 6,378,137 m sphere, the same radius the edge
/// tolerance is measured on. Rings with fewer than three points enclose
/// nothing.
#[must_use]
pub fn ring_area_sq_m(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    ring_to_polygon(ring).chamberlain_duquette_unsigned_area()
}

/// Total area of several rings, in square feet.
#[must_use]
pub fn rings_area_sq_ft(rings: &[Ring]) -> f64 {
    sq_m_to_sq_ft(rings.iter().map(|r| ring_area_sq_m(r)).fold(0.0, |acc, a| acc + a))
}

/// Converts square meters to square feet.
#[must_use]
pub fn sq_m_to_sq_ft(sq_m: f64) -> f64 {
    sq_m * SQ_FT_PER_SQ_M
}

/// Arithmetic mean of the ring's vertices.
///
/// This is deliberately not the area-weighted centroid: every listed
/// vertex counts once, including a repeated closing vertex.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ring_centroid(ring: &[LatLng]) -> Option<LatLng> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lat, lng) = ring
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(LatLng::new(lat / n, lng / n))
}

/// Builds a `geo` polygon (x = lng, y = lat). `Polygon::new` closes the
/// exterior if needed.
pub(crate) fn ring_to_polygon(ring: &[LatLng]) -> Polygon<f64> {
    let exterior: LineString<f64> = ring.iter().map(|p| (p.lng, p.lat)).collect();
    Polygon::new(exterior, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_ring(south: f64, west: f64, north: f64, east: f64) -> Ring {
        vec![
            LatLng::new(south, west),
            LatLng::new(south, east),
            LatLng::new(north, east),
            LatLng::new(north, west),
            LatLng::new(south, west),
        ]
    }

    #[test]
    fn one_degree_box_at_equator() {
        // R² · Δλ · sin(1°) on the 6,378,137 m sphere, ~12,391 km².
        let reference_sq_m = 1.239_14e10;
        let area = ring_area_sq_m(&box_ring(0.0, 0.0, 1.0, 1.0));
        assert!(
            (area - reference_sq_m).abs() / reference_sq_m < 0.001,
            "area {area} too far from {reference_sq_m}"
        );

        let sq_ft = rings_area_sq_ft(&[box_ring(0.0, 0.0, 1.0, 1.0)]);
        let reference_sq_ft = reference_sq_m * 10.7639;
        assert!((sq_ft - reference_sq_ft).abs() / reference_sq_ft < 0.01);
    }

    #[test]
    fn open_and_closed_rings_have_same_area() {
        let closed = box_ring(37.0, -122.0, 37.001, -121.999);
        let open = closed[..4].to_vec();
        let a = ring_area_sq_m(&closed);
        let b = ring_area_sq_m(&open);
        assert!(a > 0.0);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn multiple_rings_are_summed() {
        let one = box_ring(37.0, -122.0, 37.001, -121.999);
        let two = box_ring(37.01, -122.0, 37.011, -121.999);
        let total = rings_area_sq_ft(&[one.clone(), two.clone()]);
        let separate = rings_area_sq_ft(&[one]) + rings_area_sq_ft(&[two]);
        assert!((total - separate).abs() < 1e-6);
    }

    #[test]
    fn degenerate_rings_have_zero_area() {
        assert!(ring_area_sq_m(&[]).abs() < f64::EPSILON);
        assert!(ring_area_sq_m(&[LatLng::new(1.0, 1.0)]).abs() < f64::EPSILON);
        assert!(rings_area_sq_ft(&[]).abs() < f64::EPSILON);
        assert!(rings_area_sq_ft(&[]).is_sign_positive());
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let centroid = ring_centroid(&box_ring(0.0, 0.0, 2.0, 2.0)).unwrap();
        // The repeated closing vertex (0, 0) pulls the mean off-center.
        assert!((centroid.lat - 0.8).abs() < 1e-12);
        assert!((centroid.lng - 0.8).abs() < 1e-12);
        assert!(ring_centroid(&[]).is_none());
    }
}
