#![forbid(unsafe_code)]

//! The combined in-memory layout: beds, positions, and the boundary.
//!
//! [`GardenLayout`] is where cross-collection invariants live. Removing a
//! bed drops its positions; placing a plant requires the bed to exist.

use gardenkit_core::geometry::{GridPosition, Point};
use gardenkit_core::id::{BedId, PlantId};

use crate::bed::{BedDraft, BedRegistry, GardenBed};
use crate::boundary::GardenBoundary;
use crate::placement::{CanvasGeometry, PlacementTarget};
use crate::position::{PlantPosition, PositionStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GardenLayout {
    beds: BedRegistry,
    positions: PositionStore,
    boundary: GardenBoundary,
}

impl GardenLayout {
    #[must_use]
    pub fn new(beds: BedRegistry, positions: PositionStore, boundary: GardenBoundary) -> Self {
        let mut layout = Self {
            beds,
            positions,
            boundary,
        };
        let dropped = layout.drop_positions_without_bed();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped positions referencing missing beds");
        }
        layout
    }

    #[must_use]
    pub fn beds(&self) -> &BedRegistry {
        &self.beds
    }

    #[must_use]
    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    #[must_use]
    pub const fn boundary(&self) -> &GardenBoundary {
        &self.boundary
    }

    /// Add a bed. An explicit origin is clamped so the footprint fits the
    /// boundary, as in [`move_bed`](Self::move_bed).
    pub fn add_bed(&mut self, draft: BedDraft) -> Option<BedId> {
        self.beds.add_within(draft, Some(&self.boundary))
    }

    pub fn add_beds(&mut self, draft: BedDraft, quantity: u32, columns: u32) -> Vec<BedId> {
        self.beds.add_bulk(draft, quantity, columns)
    }

    /// Remove a bed and every position inside it.
    pub fn remove_bed(&mut self, id: &BedId) -> Option<GardenBed> {
        let bed = self.beds.remove(id)?;
        let cascaded = self.positions.remove_bed(id);
        tracing::debug!(bed = %id, cascaded, "removed bed");
        Some(bed)
    }

    pub fn rename_bed(&mut self, id: &BedId, name: &str) -> bool {
        self.beds.rename(id, name)
    }

    /// Move a bed, clamping its footprint into the boundary.
    pub fn move_bed(&mut self, id: &BedId, x: i64, y: i64) -> Option<GridPosition> {
        self.beds.reposition(id, x, y, Some(&self.boundary))
    }

    /// Place a plant inside an existing bed. `None` if the bed is gone.
    pub fn place_plant(
        &mut self,
        plant: PlantId,
        bed: &BedId,
        x: f64,
        y: f64,
    ) -> Option<PlantPosition> {
        if !self.beds.contains(bed) {
            return None;
        }
        Some(self.positions.place(plant, bed.clone(), x, y))
    }

    pub fn unplace_plant(&mut self, plant: &PlantId) -> Option<PlantPosition> {
        self.positions.remove_plant(plant)
    }

    /// Swap in another season's positions.
    pub fn replace_positions(&mut self, positions: PositionStore) -> PositionStore {
        let previous = std::mem::replace(&mut self.positions, positions);
        self.drop_positions_without_bed();
        previous
    }

    /// Drop positions whose plant no longer exists; returns how many.
    pub fn prune(&mut self, plant_exists: impl Fn(&PlantId) -> bool) -> usize {
        let removed = self.positions.retain(|p| plant_exists(&p.plant_id));
        removed + self.drop_positions_without_bed()
    }

    fn drop_positions_without_bed(&mut self) -> usize {
        let beds = &self.beds;
        self.positions.retain(|p| beds.contains(&p.bed_id))
    }

    /// Replace the boundary. Beds already placed stay where they are.
    pub fn set_boundary(&mut self, boundary: GardenBoundary) {
        self.boundary = GardenBoundary {
            width: crate::boundary::clamp_dimension(boundary.width),
            height: crate::boundary::clamp_dimension(boundary.height),
            show_boundary: boundary.show_boundary,
        };
    }

    /// Placed beds whose footprint extends past the current boundary.
    pub fn overflowing_beds(&self) -> impl Iterator<Item = &GardenBed> + '_ {
        self.beds
            .beds()
            .iter()
            .filter(|b| !self.boundary.contains_footprint(b.position, b.size()))
    }

    /// Topmost placed bed under `point`; later beds draw above earlier ones.
    #[must_use]
    pub fn bed_at(&self, point: Point, geometry: &CanvasGeometry) -> Option<&BedId> {
        self.beds
            .beds()
            .iter()
            .rev()
            .find(|bed| geometry.bed_rect(bed).is_some_and(|r| r.contains(point)))
            .map(|bed| &bed.id)
    }

    /// Drop target under `point`: a bed if one is hit, else bare canvas.
    #[must_use]
    pub fn target_at(&self, point: Point, geometry: &CanvasGeometry) -> PlacementTarget {
        match self.bed_at(point, geometry) {
            Some(id) => PlacementTarget::Bed {
                id: id.clone(),
                rect: None,
            },
            None => PlacementTarget::Canvas,
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (BedRegistry, PositionStore, GardenBoundary) {
        (self.beds, self.positions, self.boundary)
    }
}
