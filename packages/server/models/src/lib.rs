#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the lot-measure server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the parcel types to allow independent evolution of the API
//! contract.

use lot_measure_parcel::ExportShape;
use lot_measure_parcel_models::{LatLng, ParcelRole, SelectionTier};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters for the parcel lookup endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelQueryParams {
    /// Free-form street address. Takes priority over `lat`/`lng`.
    pub address: Option<String>,
    /// Latitude for a location lookup.
    pub lat: Option<f64>,
    /// Longitude for a location lookup.
    pub lng: Option<f64>,
    /// Latitude of the focus point used to pick the main parcel.
    pub focus_lat: Option<f64>,
    /// Longitude of the focus point used to pick the main parcel.
    pub focus_lng: Option<f64>,
}

impl ParcelQueryParams {
    /// Explicit focus point, if both coordinates were given.
    #[must_use]
    pub fn focus(&self) -> Option<LatLng> {
        Some(LatLng::new(self.focus_lat?, self.focus_lng?))
    }
}

/// A candidate parcel in a selection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParcel {
    /// Index into the candidate list as received from upstream.
    pub index: usize,
    /// Main or neighbor.
    pub role: ParcelRole,
    /// Convenience flag, `true` for the main parcel.
    pub is_main: bool,
    /// Original parcel geometry.
    pub geometry: Option<geojson::Geometry>,
    /// Upstream property bag.
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// Lot size: `properties.areaSqFt` if present, else computed.
    pub lot_sq_ft: f64,
}

/// Result of a selection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    /// Parcels with the main parcel first.
    pub parcels: Vec<ApiParcel>,
    /// Tier that chose the main parcel; absent when nothing was found.
    pub tier: Option<SelectionTier>,
    /// Focus point the selection ran with.
    pub focus: Option<LatLng>,
    /// Lot size of the main parcel.
    pub main_lot_sq_ft: Option<f64>,
}

/// Body of `POST /api/parcels/select`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    /// The candidate payload as previously returned by the lookup (any
    /// accepted `FeatureCollection`-like shape).
    pub candidates: serde_json::Value,
    /// Clicked or searched point.
    pub focus: Option<LatLng>,
}

/// Body of `POST /api/export`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    /// Shapes to export, in order.
    pub shapes: Vec<ExportShape>,
}
