#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry helpers for parcel candidate resolution.
//!
//! - [`flatten`] turns `GeoJSON` `Polygon`/`MultiPolygon` geometries into
//!   `(lat, lng)` rings (outer rings only; holes are ignored).
//! - [`area`] computes projected ring area and the unweighted vertex
//!   centroid used as a last-resort tie-break.
//! - [`containment`] answers strict point-in-ring and
//!   within-tolerance-of-edge questions.
//!
//! The [`GeometryOps`] trait bundles these behind a small capability
//! interface so the selector never talks to `geo` directly.

pub mod area;
pub mod containment;
pub mod flatten;
mod ops;

pub use area::{ring_area_sq_m, ring_centroid, rings_area_sq_ft, sq_m_to_sq_ft};
pub use containment::{contains_point, is_on_edge};
pub use flatten::{flatten, flatten_feature};
pub use ops::{GeoOps, GeometryOps};

/// Earth radius (meters) used to express the edge tolerance as an angle.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Square feet per square meter.
pub const SQ_FT_PER_SQ_M: f64 = 10.7639;

/// Default boundary tolerance: roughly 12 meters, as radians.
pub const DEFAULT_EDGE_TOLERANCE_RAD: f64 = 12.0 / EARTH_RADIUS_M;
