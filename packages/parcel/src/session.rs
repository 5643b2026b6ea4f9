//! Current parcel selection, owned by the rendering layer.
//!
//! Two states: [`SessionState::Empty`] (no candidates) and
//! [`SessionState::Resolved`] (a selection is current). Loading a search
//! result or clicking the map replaces the selection atomically; nothing
//! else carries over between clicks.

use lot_measure_geometry::{GeoOps, GeometryOps};
use lot_measure_parcel_models::{LatLng, ParcelFeature, RenderedParcel, SelectionResult};

use crate::lot::lot_sq_ft;
use crate::selector::{Selector, render};

/// Candidate-resolution state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No candidates loaded.
    #[default]
    Empty,
    /// A selection over `features` is current.
    Resolved {
        /// Candidates exactly as loaded; never reordered or modified.
        features: Vec<ParcelFeature>,
        /// Focus point of the most recent pass.
        focus: Option<LatLng>,
        /// Result of the most recent pass.
        selection: SelectionResult,
    },
}

/// Parcel session holding the selector and the current state.
#[derive(Debug, Clone)]
pub struct ParcelSession<O = GeoOps> {
    selector: Selector<O>,
    state: SessionState,
}

impl Default for ParcelSession<GeoOps> {
    fn default() -> Self {
        Self::new(Selector::new(GeoOps))
    }
}

impl<O: GeometryOps> ParcelSession<O> {
    /// Creates an empty session using `selector`.
    #[must_use]
    pub const fn new(selector: Selector<O>) -> Self {
        Self {
            selector,
            state: SessionState::Empty,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Loads a new search result, replacing whatever was current.
    ///
    /// Zero candidates, or a focus with no candidate that has a ring,
    /// leaves the session empty and returns `None`.
    pub fn load(
        &mut self,
        features: Vec<ParcelFeature>,
        focus: Option<LatLng>,
    ) -> Option<&SelectionResult> {
        if features.is_empty() {
            log::info!("No parcel candidates to resolve");
            self.state = SessionState::Empty;
            return None;
        }

        let selection = self.selector.select(&features, focus);
        if selection.is_empty() {
            log::info!("None of {} parcel candidate(s) can be selected", features.len());
            self.state = SessionState::Empty;
            return None;
        }

        self.state = SessionState::Resolved {
            features,
            focus,
            selection,
        };
        self.selection()
    }

    /// Re-runs selection over the loaded candidates with `point` as the
    /// focus. Does nothing while empty.
    pub fn click(&mut self, point: LatLng) -> Option<&SelectionResult> {
        let SessionState::Resolved {
            features,
            focus,
            selection,
        } = &mut self.state
        else {
            return None;
        };

        *selection = self.selector.select(features, Some(point));
        *focus = Some(point);
        log::debug!("Re-selected main parcel at {point:?}: {:?}", selection.main());
        Some(&*selection)
    }

    /// Drops the current candidates.
    pub fn reset(&mut self) {
        self.state = SessionState::Empty;
    }

    /// Current selection, if resolved.
    #[must_use]
    pub const fn selection(&self) -> Option<&SelectionResult> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Resolved { selection, .. } => Some(selection),
        }
    }

    /// Loaded candidates in their original order.
    #[must_use]
    pub fn features(&self) -> &[ParcelFeature] {
        match &self.state {
            SessionState::Empty => &[],
            SessionState::Resolved { features, .. } => features,
        }
    }

    /// The current main parcel.
    #[must_use]
    pub fn main_feature(&self) -> Option<&ParcelFeature> {
        self.selection()
            .and_then(SelectionResult::main)
            .and_then(|i| self.features().get(i))
    }

    /// Lot square feet of the current main parcel.
    #[must_use]
    pub fn main_lot_sq_ft(&self) -> Option<f64> {
        self.main_feature()
            .map(|f| lot_sq_ft(f, self.selector.ops()))
    }

    /// Drawable parcels for the current selection, main first.
    #[must_use]
    pub fn render(&self) -> Vec<RenderedParcel> {
        self.selection()
            .map(|selection| render(self.features(), selection))
            .unwrap_or_default()
    }
}
