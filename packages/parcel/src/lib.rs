#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel candidate resolution for the lot-measure tool.
//!
//! An address search produces a focus point and the boundary API returns a
//! handful of candidate parcels. This crate:
//!
//! 1. normalizes the upstream payload into [`ParcelFeature`]s
//!    ([`normalize`]),
//! 2. picks the main parcel with a tiered strategy ([`selector`]):
//!    strict containment, then boundary tolerance, then nearest vertex
//!    centroid,
//! 3. keeps the current result in an explicit two-state
//!    [`ParcelSession`] so a map click can re-run the selection,
//! 4. tracks user-drawn lot and turf shapes with undo/redo
//!    ([`drawing`]), and
//! 5. exports everything as closed-ring `GeoJSON` ([`export`]).
//!
//! [`ParcelFeature`]: lot_measure_parcel_models::ParcelFeature

pub mod drawing;
pub mod export;
pub mod lot;
pub mod normalize;
pub mod selector;
pub mod session;

pub use drawing::{DrawnRole, DrawnShape, MeasurementSummary, Measurements};
pub use export::{
    ExportShape, close_ring, feature_collection, session_feature_collection, session_shapes,
    shape_feature,
};
pub use lot::lot_sq_ft;
pub use normalize::{normalize_payload, to_feature_collection};
pub use selector::{Selector, render, select};
pub use session::{ParcelSession, SessionState};

#[cfg(test)]
pub(crate) mod test_support {
    use geojson::{Geometry, Value};
    use lot_measure_parcel_models::{LatLng, ParcelFeature};

    /// Square parcel with its south-west corner at `(lat, lng)`.
    pub fn square_feature(lat: f64, lng: f64, size: f64) -> ParcelFeature {
        ParcelFeature::new(Geometry::new(Value::Polygon(vec![vec![
            vec![lng, lat],
            vec![lng + size, lat],
            vec![lng + size, lat + size],
            vec![lng, lat + size],
            vec![lng, lat],
        ]])))
    }

    pub const fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng)
    }
}
