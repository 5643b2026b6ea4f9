#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel, ring, and selection types shared across the lot-measure crates.
//!
//! Coordinates inside this crate are always `(latitude, longitude)` pairs.
//! `GeoJSON` positions (`[longitude, latitude]`) only appear inside the
//! raw [`geojson::Geometry`] carried by a [`ParcelFeature`].

use serde::{Deserialize, Serialize};

/// A geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the `GeoJSON` position `[lng, lat]` for this point.
    #[must_use]
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }
}

/// One boundary loop of a polygon, in traversal order.
///
/// A ring may or may not repeat its first point at the end; consumers
/// that need a closed ring (e.g. `GeoJSON` export) close it themselves.
pub type Ring = Vec<LatLng>;

/// Role the selector assigns to a candidate parcel. Derived, never stored
/// on the feature itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParcelRole {
    /// The parcel judged to correspond to the searched address.
    Main,
    /// Any other candidate returned alongside the main parcel.
    Neighbor,
}

/// Role tag written to exported `GeoJSON` features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeRole {
    /// The main parcel boundary.
    Parcel,
    /// A user-drawn lot outline.
    Lot,
    /// A neighboring parcel boundary.
    Neighbor,
    /// A user-drawn turf (lawn) area.
    Turf,
}

impl ShapeRole {
    /// The string written into `properties.role`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parcel => "parcel",
            Self::Lot => "lot",
            Self::Neighbor => "neighbor",
            Self::Turf => "turf",
        }
    }
}

impl From<ParcelRole> for ShapeRole {
    fn from(role: ParcelRole) -> Self {
        match role {
            ParcelRole::Main => Self::Parcel,
            ParcelRole::Neighbor => Self::Neighbor,
        }
    }
}

impl std::fmt::Display for ShapeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate parcel as returned by the boundary API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelFeature {
    /// Parcel geometry. `None` when the upstream feature had no usable
    /// `Polygon`/`MultiPolygon` geometry.
    pub geometry: Option<geojson::Geometry>,
    /// Upstream property bag (e.g. `areaSqFt`).
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl ParcelFeature {
    /// Creates a feature with no properties.
    #[must_use]
    pub fn new(geometry: geojson::Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            properties: serde_json::Map::new(),
        }
    }

    /// Returns the authoritative area from `properties.areaSqFt` when it
    /// is present and finite.
    #[must_use]
    pub fn area_sq_ft_property(&self) -> Option<f64> {
        self.properties
            .get("areaSqFt")
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite())
    }
}

/// Which tier of the selector picked the main parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionTier {
    /// No focus point; the first candidate in input order.
    Default,
    /// Focus point strictly inside the parcel.
    Interior,
    /// Focus point within tolerance of the parcel boundary.
    Boundary,
    /// Parcel whose ring centroid is closest to the focus point.
    Nearest,
}

/// Ordering of candidates produced by one selection pass.
///
/// Holds indices into the candidate list the pass ran over. The main
/// parcel is always first; the rest keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    /// Candidate indices, main first.
    pub order: Vec<usize>,
    /// Tier that chose the main parcel. `None` for an empty result.
    pub tier: Option<SelectionTier>,
}

impl SelectionResult {
    /// An empty result (no candidates).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            order: Vec::new(),
            tier: None,
        }
    }

    /// Whether the result holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Index of the main parcel.
    #[must_use]
    pub fn main(&self) -> Option<usize> {
        self.order.first().copied()
    }

    /// Indices of the neighbor parcels in their original relative order.
    #[must_use]
    pub fn neighbors(&self) -> &[usize] {
        self.order.get(1..).unwrap_or_default()
    }

    /// Iterates `(index, role)` pairs in output order.
    pub fn roles(&self) -> impl Iterator<Item = (usize, ParcelRole)> + '_ {
        self.order.iter().enumerate().map(|(pos, &idx)| {
            let role = if pos == 0 {
                ParcelRole::Main
            } else {
                ParcelRole::Neighbor
            };
            (idx, role)
        })
    }
}

/// A parcel ready to be drawn by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedParcel {
    /// Index into the original candidate list.
    pub index: usize,
    /// The parcel's original geometry.
    pub geometry: Option<geojson::Geometry>,
    /// Flattened outer rings in `(lat, lng)` order.
    pub rings: Vec<Ring>,
    /// Whether this is the main parcel.
    pub is_main: bool,
}
