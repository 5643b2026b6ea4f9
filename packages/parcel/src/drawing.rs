//! User-drawn lot and turf shapes with undo/redo.
//!
//! Every mutation records a command carrying whatever it needs to be
//! reversed. Undoing moves the command to the redo stack; any new
//! mutation clears the redo stack.

use lot_measure_geometry::rings_area_sq_ft;
use lot_measure_parcel_models::{Ring, ShapeRole};
use serde::{Deserialize, Serialize};

/// What a drawn shape measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawnRole {
    /// Outline of the whole lot.
    Lot,
    /// A turf (lawn) area inside the lot.
    Turf,
}

impl From<DrawnRole> for ShapeRole {
    fn from(role: DrawnRole) -> Self {
        match role {
            DrawnRole::Lot => Self::Lot,
            DrawnRole::Turf => Self::Turf,
        }
    }
}

/// A polygon drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    /// What the shape measures.
    pub role: DrawnRole,
    /// Outline in `(lat, lng)` order.
    pub ring: Ring,
}

impl DrawnShape {
    /// Area of the shape in square feet.
    #[must_use]
    pub fn area_sq_ft(&self) -> f64 {
        rings_area_sq_ft(std::slice::from_ref(&self.ring))
    }
}

#[derive(Debug, Clone)]
enum Command {
    /// Shape appended at the end.
    Add(DrawnShape),
    /// Shape removed from `index`.
    Remove(usize, DrawnShape),
    /// Outline at `index` replaced; holds the other version of the ring.
    Edit(usize, Ring),
    /// All shapes removed; holds them.
    Clear(Vec<DrawnShape>),
}

/// Totals reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSummary {
    /// Sum of all turf shapes.
    pub turf_sq_ft: f64,
    /// Sum of all drawn lot shapes.
    pub drawn_lot_sq_ft: f64,
    /// Lot figure used for comparison: the parcel figure if known,
    /// otherwise the drawn lot total when non-zero.
    pub lot_sq_ft: Option<f64>,
    /// Turf as a fraction of the lot.
    pub turf_share: Option<f64>,
}

/// Drawn shapes plus their edit history.
#[derive(Debug, Clone, Default)]
pub struct Measurements {
    shapes: Vec<DrawnShape>,
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl Measurements {
    /// Creates an empty drawing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current shapes in drawing order.
    #[must_use]
    pub fn shapes(&self) -> &[DrawnShape] {
        &self.shapes
    }

    /// Adds a shape.
    pub fn add(&mut self, shape: DrawnShape) {
        self.shapes.push(shape.clone());
        self.record(Command::Add(shape));
    }

    /// Removes the shape at `index`. Returns it, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<DrawnShape> {
        if index >= self.shapes.len() {
            return None;
        }
        let shape = self.shapes.remove(index);
        self.record(Command::Remove(index, shape.clone()));
        Some(shape)
    }

    /// Replaces the outline of the shape at `index` (vertex drag).
    /// Returns `false` if out of range.
    pub fn edit(&mut self, index: usize, ring: Ring) -> bool {
        let Some(shape) = self.shapes.get_mut(index) else {
            return false;
        };
        let previous = std::mem::replace(&mut shape.ring, ring);
        self.record(Command::Edit(index, previous));
        true
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        if self.shapes.is_empty() {
            return;
        }
        let previous = std::mem::take(&mut self.shapes);
        self.record(Command::Clear(previous));
    }

    /// Whether there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Reverts the most recent change. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.undo.pop() else {
            return false;
        };
        let inverse = self.revert(command);
        self.redo.push(inverse);
        true
    }

    /// Re-applies the most recently undone change. Returns `false` if there
    /// was none.
    pub fn redo(&mut self) -> bool {
        let Some(command) = self.redo.pop() else {
            return false;
        };
        let applied = self.reapply(command);
        self.undo.push(applied);
        true
    }

    /// Total turf area.
    #[must_use]
    pub fn turf_sq_ft(&self) -> f64 {
        self.area_of(DrawnRole::Turf)
    }

    /// Total drawn lot area.
    #[must_use]
    pub fn lot_sq_ft(&self) -> f64 {
        self.area_of(DrawnRole::Lot)
    }

    /// Turf versus lot totals. `parcel_lot_sq_ft` is the lot figure of
    /// the selected parcel, if one is loaded.
    #[must_use]
    pub fn summary(&self, parcel_lot_sq_ft: Option<f64>) -> MeasurementSummary {
        let turf_sq_ft = self.turf_sq_ft();
        let drawn_lot_sq_ft = self.lot_sq_ft();
        let lot_sq_ft = parcel_lot_sq_ft
            .filter(|v| v.is_finite() && *v > 0.0)
            .or_else(|| (drawn_lot_sq_ft > 0.0).then_some(drawn_lot_sq_ft));
        MeasurementSummary {
            turf_sq_ft,
            drawn_lot_sq_ft,
            lot_sq_ft,
            turf_share: lot_sq_ft.map(|lot| turf_sq_ft / lot),
        }
    }

    fn area_of(&self, role: DrawnRole) -> f64 {
        self.shapes
            .iter()
            .filter(|s| s.role == role)
            .map(DrawnShape::area_sq_ft)
            .sum()
    }

    fn record(&mut self, command: Command) {
        self.undo.push(command);
        self.redo.clear();
    }

    /// Undoes `command` and returns the command that redoes it.
    fn revert(&mut self, command: Command) -> Command {
        match command {
            Command::Add(shape) => {
                self.shapes.pop();
                Command::Add(shape)
            }
            Command::Remove(index, shape) => {
                self.shapes.insert(index.min(self.shapes.len()), shape.clone());
                Command::Remove(index, shape)
            }
            Command::Edit(index, ring) => self.swap_ring(index, ring),
            Command::Clear(previous) => {
                self.shapes = previous.clone();
                Command::Clear(previous)
            }
        }
    }

    /// Redoes `command` and returns the command that undoes it again.
    fn reapply(&mut self, command: Command) -> Command {
        match command {
            Command::Add(shape) => {
                self.shapes.push(shape.clone());
                Command::Add(shape)
            }
            Command::Remove(index, shape) => {
                if index < self.shapes.len() {
                    self.shapes.remove(index);
                }
                Command::Remove(index, shape)
            }
            Command::Edit(index, ring) => self.swap_ring(index, ring),
            Command::Clear(_) => Command::Clear(std::mem::take(&mut self.shapes)),
        }
    }

    fn swap_ring(&mut self, index: usize, ring: Ring) -> Command {
        match self.shapes.get_mut(index) {
            Some(shape) => Command::Edit(index, std::mem::replace(&mut shape.ring, ring)),
            None => Command::Edit(index, ring),
        }
    }
}
