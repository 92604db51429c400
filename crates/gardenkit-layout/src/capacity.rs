#![forbid(unsafe_code)]

//! Per-bed space usage.
//!
//! Capacity is informational: an overcrowded bed is flagged, never rejected.

use std::collections::{BTreeMap, HashMap};

use gardenkit_core::id::{BedId, PlantId};
use serde::{Deserialize, Serialize};

use crate::bed::GardenBed;
use crate::layout::GardenLayout;
use crate::position::PositionStore;

/// Source of each plant's space requirement.
///
/// Returning `None` means the plant is unknown; its position is skipped.
pub trait SpaceLookup {
    fn space_required(&self, plant: &PlantId) -> Option<f64>;
}

impl SpaceLookup for HashMap<PlantId, f64> {
    fn space_required(&self, plant: &PlantId) -> Option<f64> {
        self.get(plant).copied()
    }
}

impl SpaceLookup for BTreeMap<PlantId, f64> {
    fn space_required(&self, plant: &PlantId) -> Option<f64> {
        self.get(plant).copied()
    }
}

/// Space usage of one bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedCapacity {
    pub bed_id: BedId,
    pub plant_count: usize,
    pub used: f64,
    pub total: f64,
    /// `used / total * 100`, or `0` for a zero-area bed.
    pub utilization_pct: f64,
    /// `used > total`.
    pub overcrowded: bool,
}

impl BedCapacity {
    /// Remaining space, never negative.
    #[must_use]
    pub fn available(&self) -> f64 {
        (self.total - self.used).max(0.0)
    }
}

/// Compute the capacity of one bed.
#[must_use]
pub fn bed_capacity(
    bed: &GardenBed,
    positions: &PositionStore,
    lookup: &(impl SpaceLookup + ?Sized),
) -> BedCapacity {
    let (plant_count, used) = positions
        .in_bed(&bed.id)
        .filter_map(|p| lookup.space_required(&p.plant_id))
        .fold((0usize, 0.0f64), |(n, sum), space| {
            let space = if space.is_finite() && space > 0.0 { space } else { 0.0 };
            (n + 1, sum + space)
        });
    let total = bed.area() as f64;
    let utilization_pct = if total > 0.0 { used / total * 100.0 } else { 0.0 };
    BedCapacity {
        bed_id: bed.id.clone(),
        plant_count,
        used,
        total,
        utilization_pct,
        overcrowded: used > total,
    }
}

/// Capacity of every bed in the layout, in bed order.
#[must_use]
pub fn garden_capacity(
    layout: &GardenLayout,
    lookup: &(impl SpaceLookup + ?Sized),
) -> Vec<BedCapacity> {
    layout
        .beds()
        .beds()
        .iter()
        .map(|bed| bed_capacity(bed, layout.positions(), lookup))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bed(id: &str, w: u32, h: u32) -> GardenBed {
        GardenBed::new(BedId::new(id), id, w, h)
    }

    #[test]
    fn two_by_two_with_two_large_plants_is_overcrowded() {
        let b = bed("b1", 2, 2);
        let mut positions = PositionStore::new();
        positions.place(PlantId::new("p1"), b.id.clone(), 0.2, 0.2);
        positions.place(PlantId::new("p2"), b.id.clone(), 0.8, 0.8);
        let lookup: HashMap<_, _> = [(PlantId::new("p1"), 3.0), (PlantId::new("p2"), 3.0)].into();

        let cap = bed_capacity(&b, &positions, &lookup);
        assert_eq!(cap.used, 6.0);
        assert_eq!(cap.total, 4.0);
        assert_eq!(cap.utilization_pct, 150.0);
        assert!(cap.overcrowded);
        assert_eq!(cap.available(), 0.0);
    }

    #[test]
    fn exactly_full_is_not_overcrowded() {
        let b = bed("b1", 2, 1);
        let mut positions = PositionStore::new();
        positions.place(PlantId::new("p1"), b.id.clone(), 0.5, 0.5);
        let lookup: HashMap<_, _> = [(PlantId::new("p1"), 2.0)].into();
        let cap = bed_capacity(&b, &positions, &lookup);
        assert!(!cap.overcrowded);
        assert_eq!(cap.utilization_pct, 100.0);
    }

    #[test]
    fn zero_area_bed_reports_zero_utilization() {
        let b = bed("b1", 0, 3);
        let mut positions = PositionStore::new();
        positions.place(PlantId::new("p1"), b.id.clone(), 0.5, 0.5);
        let lookup: HashMap<_, _> = [(PlantId::new("p1"), 1.0)].into();
        let cap = bed_capacity(&b, &positions, &lookup);
        assert_eq!(cap.utilization_pct, 0.0);
        assert!(cap.overcrowded);
    }

    #[test]
    fn unknown_and_bad_plants_are_skipped() {
        let b = bed("b1", 3, 3);
        let mut positions = PositionStore::new();
        positions.place(PlantId::new("ghost"), b.id.clone(), 0.5, 0.5);
        positions.place(PlantId::new("nan"), b.id.clone(), 0.5, 0.5);
        positions.place(PlantId::new("ok"), b.id.clone(), 0.5, 0.5);
        let lookup: HashMap<_, _> =
            [(PlantId::new("nan"), f64::NAN), (PlantId::new("ok"), 1.5)].into();
        let cap = bed_capacity(&b, &positions, &lookup);
        assert_eq!(cap.plant_count, 2);
        assert_eq!(cap.used, 1.5);
    }
}
