use geo::{Distance as _, Haversine, Point};
use lot_measure_parcel_models::LatLng;

/// Geometry capabilities the candidate selector relies on.
///
/// Implemented by [`GeoOps`]; tests and alternative geometry backends can
/// supply their own.
pub trait GeometryOps {
    /// Whether `point` is strictly inside `ring`.
    fn contains_point(&self, ring: &[LatLng], point: LatLng) -> bool;

    /// Whether `point` is within `tolerance_rad` of an edge of `ring`.
    fn is_on_edge(&self, ring: &[LatLng], point: LatLng, tolerance_rad: f64) -> bool;

    /// Area enclosed by `ring` in square meters.
    fn ring_area(&self, ring: &[LatLng]) -> f64;

    /// Great-circle distance between two points in meters.
    fn distance(&self, a: LatLng, b: LatLng) -> f64;
}

/// [`GeometryOps`] backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoOps;

impl GeometryOps for GeoOps {
    fn contains_point(&self, ring: &[LatLng], point: LatLng) -> bool {
        crate::contains_point(ring, point)
    }

    fn is_on_edge(&self, ring: &[LatLng], point: LatLng, tolerance_rad: f64) -> bool {
        crate::is_on_edge(ring, point, tolerance_rad)
    }

    fn ring_area(&self, ring: &[LatLng]) -> f64 {
        crate::ring_area_sq_m(ring)
    }

    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        Haversine.distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_great_circle_meters() {
        // One degree of longitude on the equator is ~111.2 km.
        let d = GeoOps.distance(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 100.0, "distance was {d}");
        assert!(GeoOps.distance(LatLng::new(37.0, -122.0), LatLng::new(37.0, -122.0)) < 1e-9);
    }
}
