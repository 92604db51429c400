#![forbid(unsafe_code)]

//! Placement engine: pointer coordinates in, layout mutations out.
//!
//! Every input mode (native drag-and-drop, touch, click-to-place) ends in the
//! same call, [`PlacementEngine::apply`], with a [`PlacementRequest`]
//! describing *what* moves, *where* it was dropped, and the raw pointer
//! position. The transforms themselves are pure functions:
//!
//! - [`snap_to_grid`]: pointer → nearest grid cell on the canvas.
//! - [`clamp_bed_origin`]: grid cell → origin that keeps the bed inside the
//!   garden boundary.
//! - [`plant_fraction`]: pointer → `[0,1]²` position inside a bed rect.

use gardenkit_core::geometry::{GridPosition, GridSize, Point, Rect, clamp_unit};
use gardenkit_core::id::{BedId, PlantId};
use serde::{Deserialize, Serialize};

use crate::bed::GardenBed;
use crate::boundary::GardenBoundary;
use crate::layout::GardenLayout;
use crate::position::PlantPosition;

/// Tunables for pixel ↔ grid mapping and gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Size of one grid unit in pixels.
    pub grid_cell_px: f64,
    /// Offset of the grid's top-left from the canvas element's top-left
    /// (padding + border).
    pub content_offset: Point,
    /// Columns scanned per row when bulk-creating beds.
    pub bulk_columns: u32,
    /// Pointer travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    /// Hit radius of a plant marker.
    pub marker_radius_px: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            grid_cell_px: 40.0,
            content_offset: Point::new(8.0, 8.0),
            bulk_columns: 6,
            drag_threshold_px: 4.0,
            marker_radius_px: 12.0,
        }
    }
}

impl PlacementConfig {
    /// Grid cell size, falling back to 1px for non-positive/non-finite values.
    #[must_use]
    pub fn cell_px(&self) -> f64 {
        if self.grid_cell_px.is_finite() && self.grid_cell_px > 0.0 {
            self.grid_cell_px
        } else {
            1.0
        }
    }
}

/// Where the garden canvas sits on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Canvas element rectangle in page pixels.
    pub bounds: Rect,
    pub config: PlacementConfig,
}

impl CanvasGeometry {
    #[must_use]
    pub fn new(bounds: Rect, config: PlacementConfig) -> Self {
        Self { bounds, config }
    }

    /// Page position of grid cell `(0, 0)`.
    #[must_use]
    pub fn grid_origin(&self) -> Point {
        Point::new(
            self.bounds.x + self.config.content_offset.x,
            self.bounds.y + self.config.content_offset.y,
        )
    }

    /// Rendered rectangle of a placed bed; `None` for unplaced beds.
    #[must_use]
    pub fn bed_rect(&self, bed: &GardenBed) -> Option<Rect> {
        if !bed.position.is_placed() {
            return None;
        }
        let cell = self.config.cell_px();
        let origin = self.grid_origin();
        Some(Rect::new(
            origin.x + f64::from(bed.position.x) * cell,
            origin.y + f64::from(bed.position.y) * cell,
            f64::from(bed.width) * cell,
            f64::from(bed.height) * cell,
        ))
    }

    /// Page position of a plant marker inside its bed.
    #[must_use]
    pub fn marker_point(&self, bed: &GardenBed, position: &PlantPosition) -> Option<Point> {
        let rect = self.bed_rect(bed)?;
        Some(Point::new(
            rect.x + position.x * rect.width,
            rect.y + position.y * rect.height,
        ))
    }
}

/// Snap a page pointer to the nearest grid cell (unclamped).
#[must_use]
pub fn snap_to_grid(pointer: Point, geometry: &CanvasGeometry) -> (i64, i64) {
    let cell = geometry.config.cell_px();
    let (dx, dy) = pointer.offset_from(geometry.grid_origin());
    (round_to_cell(dx / cell), round_to_cell(dy / cell))
}

fn round_to_cell(units: f64) -> i64 {
    if units.is_nan() {
        return 0;
    }
    // Half-up, matching DOM Math.round.
    (units + 0.5).floor() as i64
}

/// Clamp a requested bed origin.
///
/// Both axes are clamped to `>= 0`; with known bounds they are also clamped
/// to `boundary - bed size`. A bed larger than the garden stays at `0` on
/// that axis.
#[must_use]
pub fn clamp_bed_origin(
    x: i64,
    y: i64,
    size: GridSize,
    bounds: Option<&GardenBoundary>,
) -> GridPosition {
    let (mut x, mut y) = (x, y);
    if let Some(bounds) = bounds {
        let (max_x, max_y) = bounds.max_origin(size);
        x = x.min(max_x);
        y = y.min(max_y);
    }
    GridPosition::new(to_grid(x.max(0)), to_grid(y.max(0)))
}

fn to_grid(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Grid origin for a bed dropped at `pointer`.
#[must_use]
pub fn bed_grid_position(
    pointer: Point,
    geometry: &CanvasGeometry,
    size: GridSize,
    bounds: Option<&GardenBoundary>,
) -> GridPosition {
    let (x, y) = snap_to_grid(pointer, geometry);
    clamp_bed_origin(x, y, size, bounds)
}

/// Fractional position of `pointer` inside `bed_rect`, clamped to `[0,1]`.
///
/// `None` when the rectangle has no area.
#[must_use]
pub fn plant_fraction(pointer: Point, bed_rect: &Rect) -> Option<(f64, f64)> {
    let (fx, fy) = bed_rect.relative_fraction(pointer)?;
    Some((clamp_unit(fx), clamp_unit(fy)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// The thing being moved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PlacementSubject {
    Plant(PlantId),
    Bed(BedId),
}

/// Where the subject was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementTarget {
    /// A bed; `rect` is the host-measured element rectangle when available,
    /// otherwise it is derived from the bed's grid position.
    Bed { id: BedId, rect: Option<Rect> },
    /// Empty canvas area.
    Canvas,
    /// The "drop here to unplace" zone.
    RemovalZone,
}

/// One completed gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub subject: PlacementSubject,
    pub target: PlacementTarget,
    pub pointer: Point,
}

/// Why a request left the layout untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The bed being moved or dropped onto no longer exists.
    UnknownBed,
    /// The plant being placed no longer exists.
    UnknownPlant,
    /// Plant dropped onto a bed that has no rectangle to map into.
    BedNotOnCanvas,
    /// Plant dropped onto bare canvas outside every bed.
    NoBedUnderPointer,
    /// Plant sent to the removal zone was not placed.
    NotPlaced,
    /// Beds cannot be dropped on the removal zone.
    UnsupportedTarget,
}

/// Result of applying a [`PlacementRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlacementOutcome {
    BedMoved {
        bed_id: BedId,
        position: GridPosition,
    },
    PlantPlaced {
        position: PlantPosition,
    },
    PlantUnplaced {
        plant_id: PlantId,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl PlacementOutcome {
    /// Whether the layout changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored { .. })
    }
}

/// Applies placement requests against a [`GardenLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementEngine {
    geometry: CanvasGeometry,
}

impl PlacementEngine {
    #[must_use]
    pub fn new(geometry: CanvasGeometry) -> Self {
        Self { geometry }
    }

    #[must_use]
    pub const fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    /// Update the canvas rectangle after a host resize or scroll.
    pub fn set_canvas_bounds(&mut self, bounds: Rect) {
        self.geometry.bounds = bounds;
    }

    /// Apply one request against the current in-memory layout.
    pub fn apply(&self, layout: &mut GardenLayout, request: &PlacementRequest) -> PlacementOutcome {
        let outcome = match &request.subject {
            PlacementSubject::Bed(bed_id) => {
                self.apply_bed(layout, bed_id, &request.target, request.pointer)
            }
            PlacementSubject::Plant(plant_id) => {
                self.apply_plant(layout, plant_id, &request.target, request.pointer)
            }
        };
        tracing::debug!(subject = ?request.subject, outcome = ?outcome, "applied placement");
        outcome
    }

    fn apply_bed(
        &self,
        layout: &mut GardenLayout,
        bed_id: &BedId,
        target: &PlacementTarget,
        pointer: Point,
    ) -> PlacementOutcome {
        if matches!(target, PlacementTarget::RemovalZone) {
            return PlacementOutcome::Ignored {
                reason: IgnoreReason::UnsupportedTarget,
            };
        }
        let Some(bed) = layout.beds().get(bed_id) else {
            return PlacementOutcome::Ignored {
                reason: IgnoreReason::UnknownBed,
            };
        };
        let (x, y) = snap_to_grid(pointer, &self.geometry);
        let size = bed.size();
        match layout.move_bed(bed_id, x, y) {
            Some(position) => PlacementOutcome::BedMoved {
                bed_id: bed_id.clone(),
                position,
            },
            None => {
                tracing::debug!(bed = %bed_id, ?size, "bed vanished during move");
                PlacementOutcome::Ignored {
                    reason: IgnoreReason::UnknownBed,
                }
            }
        }
    }

    fn apply_plant(
        &self,
        layout: &mut GardenLayout,
        plant_id: &PlantId,
        target: &PlacementTarget,
        pointer: Point,
    ) -> PlacementOutcome {
        let (bed_id, measured) = match target {
            PlacementTarget::RemovalZone => {
                return match layout.unplace_plant(plant_id) {
                    Some(_) => PlacementOutcome::PlantUnplaced {
                        plant_id: plant_id.clone(),
                    },
                    None => PlacementOutcome::Ignored {
                        reason: IgnoreReason::NotPlaced,
                    },
                };
            }
            PlacementTarget::Bed { id, rect } => (id.clone(), *rect),
            PlacementTarget::Canvas => match layout.bed_at(pointer, &self.geometry) {
                Some(id) => (id.clone(), None),
                None => {
                    return PlacementOutcome::Ignored {
                        reason: IgnoreReason::NoBedUnderPointer,
                    };
                }
            },
        };

        let Some(bed) = layout.beds().get(&bed_id) else {
            return PlacementOutcome::Ignored {
                reason: IgnoreReason::UnknownBed,
            };
        };
        let Some(rect) = measured.or_else(|| self.geometry.bed_rect(bed)) else {
            return PlacementOutcome::Ignored {
                reason: IgnoreReason::BedNotOnCanvas,
            };
        };
        let Some((fx, fy)) = plant_fraction(pointer, &rect) else {
            return PlacementOutcome::Ignored {
                reason: IgnoreReason::BedNotOnCanvas,
            };
        };
        match layout.place_plant(plant_id.clone(), &bed_id, fx, fy) {
            Some(position) => PlacementOutcome::PlantPlaced { position },
            None => PlacementOutcome::Ignored {
                reason: IgnoreReason::UnknownBed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CanvasGeometry {
        CanvasGeometry::new(
            Rect::new(100.0, 50.0, 600.0, 400.0),
            PlacementConfig {
                grid_cell_px: 40.0,
                content_offset: Point::new(8.0, 8.0),
                ..PlacementConfig::default()
            },
        )
    }

    #[test]
    fn snap_rounds_to_nearest_cell() {
        let g = geometry();
        // Grid origin is (108, 58).
        assert_eq!(snap_to_grid(Point::new(108.0, 58.0), &g), (0, 0));
        assert_eq!(snap_to_grid(Point::new(127.9, 58.0), &g), (0, 0));
        assert_eq!(snap_to_grid(Point::new(128.0, 78.0), &g), (1, 1));
        assert_eq!(snap_to_grid(Point::new(50.0, 10.0), &g), (-1, -1));
    }

    #[test]
    fn clamp_keeps_footprint_inside() {
        let bounds = GardenBoundary::new(10, 8);
        let size = GridSize::new(4, 2);
        assert_eq!(clamp_bed_origin(9, 9, size, Some(&bounds)), GridPosition::new(6, 6));
        assert_eq!(clamp_bed_origin(-3, 2, size, Some(&bounds)), GridPosition::new(0, 2));
        assert_eq!(clamp_bed_origin(40, 40, size, None), GridPosition::new(40, 40));
    }

    #[test]
    fn oversized_bed_pins_to_zero() {
        let bounds = GardenBoundary::new(3, 3);
        assert_eq!(
            clamp_bed_origin(2, 1, GridSize::new(5, 1), Some(&bounds)),
            GridPosition::new(0, 1)
        );
    }

    #[test]
    fn clamping_is_idempotent_past_the_edge() {
        let bounds = GardenBoundary::new(10, 8);
        let size = GridSize::new(3, 3);
        let edge = clamp_bed_origin(7, 5, size, Some(&bounds));
        assert_eq!(clamp_bed_origin(30, 5, size, Some(&bounds)), edge);
        assert_eq!(clamp_bed_origin(7, 50, size, Some(&bounds)), edge);
    }

    #[test]
    fn plant_fraction_clamps_edges() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(plant_fraction(Point::new(50.0, 25.0), &rect), Some((0.25, 0.25)));
        assert_eq!(plant_fraction(Point::new(-1.0, 101.0), &rect), Some((0.0, 1.0)));
        assert_eq!(plant_fraction(Point::new(1.0, 1.0), &Rect::from_size(0.0, 5.0)), None);
    }

    #[test]
    fn bed_rect_follows_grid() {
        let g = geometry();
        let mut bed = GardenBed::new(BedId::new("bed-1"), "North", 2, 3);
        assert!(g.bed_rect(&bed).is_none());
        bed.position = GridPosition::new(1, 2);
        assert_eq!(g.bed_rect(&bed), Some(Rect::new(148.0, 138.0, 80.0, 120.0)));
    }

    #[test]
    fn subject_and_target_json() {
        let request = PlacementRequest {
            subject: PlacementSubject::Plant(PlantId::new("plant-1")),
            target: PlacementTarget::Bed {
                id: BedId::new("bed-2"),
                rect: None,
            },
            pointer: Point::new(1.0, 2.0),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["subject"]["kind"], "plant");
        assert_eq!(json["subject"]["id"], "plant-1");
        assert_eq!(json["target"]["kind"], "bed");
    }
}
