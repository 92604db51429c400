#![forbid(unsafe_code)]

//! Declared garden boundary and its editable dimension inputs.

use gardenkit_core::geometry::{GridPosition, GridSize};
use serde::{Deserialize, Serialize};

/// Smallest garden side, in grid units.
pub const MIN_GARDEN_DIMENSION: u32 = 1;
/// Largest garden side, in grid units.
pub const MAX_GARDEN_DIMENSION: u32 = 50;

/// The declared garden rectangle beds are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenBoundary {
    pub width: u32,
    pub height: u32,
    pub show_boundary: bool,
}

impl Default for GardenBoundary {
    fn default() -> Self {
        Self {
            width: 10,
            height: 8,
            show_boundary: true,
        }
    }
}

impl GardenBoundary {
    /// Create a boundary with both sides clamped to the allowed range.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            show_boundary: true,
        }
    }

    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Largest origin that keeps a bed of `bed` size fully inside.
    ///
    /// Negative when the bed is larger than the garden on that axis.
    #[must_use]
    pub fn max_origin(&self, bed: GridSize) -> (i64, i64) {
        (
            i64::from(self.width) - i64::from(bed.width),
            i64::from(self.height) - i64::from(bed.height),
        )
    }

    /// Whether a bed at `origin` with `size` lies fully inside.
    ///
    /// Unplaced beds are never reported as overflowing.
    #[must_use]
    pub fn contains_footprint(&self, origin: GridPosition, size: GridSize) -> bool {
        if !origin.is_placed() {
            return true;
        }
        let right = i64::from(origin.x) + i64::from(size.width);
        let bottom = i64::from(origin.y) + i64::from(size.height);
        origin.x >= 0
            && origin.y >= 0
            && right <= i64::from(self.width)
            && bottom <= i64::from(self.height)
    }
}

/// Clamp a garden side into `[MIN_GARDEN_DIMENSION, MAX_GARDEN_DIMENSION]`.
#[must_use]
pub fn clamp_dimension(value: u32) -> u32 {
    value.clamp(MIN_GARDEN_DIMENSION, MAX_GARDEN_DIMENSION)
}

/// Text field state for one boundary dimension.
///
/// While the user types, any text is accepted (including empty or
/// half-typed values). On blur the text is parsed, rounded, and clamped;
/// text that is not a number reverts to the last committed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInput {
    committed: u32,
    text: String,
}

impl DimensionInput {
    #[must_use]
    pub fn new(value: u32) -> Self {
        let committed = clamp_dimension(value);
        Self {
            committed,
            text: committed.to_string(),
        }
    }

    /// Current (possibly invalid) text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last committed value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.committed
    }

    /// Replace the text while typing; nothing is validated yet.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Commit the typed text and return the resulting value.
    pub fn blur(&mut self) -> u32 {
        if let Some(parsed) = parse_dimension(&self.text) {
            self.committed = parsed;
        }
        self.text = self.committed.to_string();
        self.committed
    }
}

fn parse_dimension(text: &str) -> Option<u32> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round().clamp(
        f64::from(MIN_GARDEN_DIMENSION),
        f64::from(MAX_GARDEN_DIMENSION),
    );
    Some(rounded as u32)
}
