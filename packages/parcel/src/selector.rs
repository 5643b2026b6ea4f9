//! Main-parcel selection.
//!
//! Boundary data often returns several overlapping or adjacent candidates
//! for one address. The selector prefers geometric certainty over the
//! upstream ordering, first match wins:
//!
//! 1. no focus point: the first candidate,
//! 2. the first candidate whose outer ring strictly contains the focus,
//! 3. the first candidate whose outer ring is within tolerance of it,
//! 4. the candidate whose ring vertex centroid is nearest (great-circle).
//!
//! With a focus point, candidates without a ring are never main; if none
//! has a ring the result is empty.
//!
//! Linear scans only; candidate counts are small. A strict-containment hit
//! short-circuits even if the focus is also near another candidate's edge.

use lot_measure_geometry::{
    DEFAULT_EDGE_TOLERANCE_RAD, GeoOps, GeometryOps, flatten, flatten_feature, ring_centroid,
};
use lot_measure_parcel_models::{
    LatLng, ParcelFeature, RenderedParcel, Ring, SelectionResult, SelectionTier,
};

/// Tiered main-parcel selector.
#[derive(Debug, Clone)]
pub struct Selector<O = GeoOps> {
    ops: O,
    edge_tolerance_rad: f64,
}

impl Default for Selector<GeoOps> {
    fn default() -> Self {
        Self::new(GeoOps)
    }
}

impl<O: GeometryOps> Selector<O> {
    /// Creates a selector with the default ~12 m edge tolerance.
    #[must_use]
    pub const fn new(ops: O) -> Self {
        Self {
            ops,
            edge_tolerance_rad: DEFAULT_EDGE_TOLERANCE_RAD,
        }
    }

    /// Overrides the boundary tolerance (radians of arc).
    #[must_use]
    pub const fn with_edge_tolerance(mut self, tolerance_rad: f64) -> Self {
        self.edge_tolerance_rad = tolerance_rad;
        self
    }

    /// The geometry backend.
    pub const fn ops(&self) -> &O {
        &self.ops
    }

    /// Orders `features` with the main parcel first.
    ///
    /// An empty input gives an empty result, as does a focus with no
    /// candidate that has a ring. The remaining candidates keep their
    /// relative input order.
    #[must_use]
    pub fn select(&self, features: &[ParcelFeature], focus: Option<LatLng>) -> SelectionResult {
        if features.is_empty() {
            return SelectionResult::empty();
        }

        let picked = match focus {
            None => Some((0, SelectionTier::Default)),
            Some(focus) => {
                let outer: Vec<Option<Ring>> = features.iter().map(outer_ring).collect();
                self.pick(&outer, focus)
            }
        };

        let Some((main, tier)) = picked else {
            log::debug!("None of {} candidate(s) has a ring", features.len());
            return SelectionResult::empty();
        };

        log::debug!(
            "Selected candidate {main} of {} as main parcel ({tier:?})",
            features.len()
        );

        let order = std::iter::once(main)
            .chain((0..features.len()).filter(|&i| i != main))
            .collect();

        SelectionResult {
            order,
            tier: Some(tier),
        }
    }

    fn pick(&self, outer: &[Option<Ring>], focus: LatLng) -> Option<(usize, SelectionTier)> {
        let rings = || {
            outer
                .iter()
                .enumerate()
                .filter_map(|(i, ring)| ring.as_deref().map(|r| (i, r)))
        };

        if let Some((i, _)) = rings().find(|(_, r)| self.ops.contains_point(r, focus)) {
            return Some((i, SelectionTier::Interior));
        }

        if let Some((i, _)) =
            rings().find(|(_, r)| self.ops.is_on_edge(r, focus, self.edge_tolerance_rad))
        {
            return Some((i, SelectionTier::Boundary));
        }

        let mut best: Option<(usize, f64)> = None;
        for (i, ring) in rings() {
            let Some(centroid) = ring_centroid(ring) else {
                continue;
            };
            let d = self.ops.distance(centroid, focus);
            if best.is_none_or(|(_, best_distance)| d < best_distance) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| (i, SelectionTier::Nearest))
    }
}

/// Selects with the default [`GeoOps`] backend and tolerance.
#[must_use]
pub fn select(features: &[ParcelFeature], focus: Option<LatLng>) -> SelectionResult {
    Selector::new(GeoOps).select(features, focus)
}

/// Turns a selection into drawable parcels, main first.
#[must_use]
pub fn render(features: &[ParcelFeature], selection: &SelectionResult) -> Vec<RenderedParcel> {
    selection
        .order
        .iter()
        .enumerate()
        .filter_map(|(pos, &index)| {
            let feature = features.get(index)?;
            Some(RenderedParcel {
                index,
                geometry: feature.geometry.clone(),
                rings: flatten_feature(feature),
                is_main: pos == 0,
            })
        })
        .collect()
}

/// First flattened ring of the feature, if it has any points.
fn outer_ring(feature: &ParcelFeature) -> Option<Ring> {
    feature
        .geometry
        .as_ref()
        .and_then(|g| flatten(g).into_iter().next())
        .filter(|r| !r.is_empty())
}
