#![forbid(unsafe_code)]

//! Plant positions inside beds.

use std::collections::HashSet;

use gardenkit_core::geometry::clamp_unit;
use gardenkit_core::id::{BedId, PlantId};
use serde::{Deserialize, Serialize};

/// A plant's spot inside a bed, as fractions of the bed's width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantPosition {
    pub plant_id: PlantId,
    pub bed_id: BedId,
    pub x: f64,
    pub y: f64,
}

impl PlantPosition {
    /// Create a position with both fractions clamped to `[0, 1]`.
    #[must_use]
    pub fn new(plant_id: PlantId, bed_id: BedId, x: f64, y: f64) -> Self {
        Self {
            plant_id,
            bed_id,
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

/// At-most-one-position-per-plant store for one season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStore {
    positions: Vec<PlantPosition>,
}

impl PositionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt stored positions.
    ///
    /// Fractions are re-clamped and, if a plant appears more than once, the
    /// last entry wins.
    #[must_use]
    pub fn from_positions(positions: Vec<PlantPosition>) -> Self {
        let mut seen = HashSet::new();
        let mut kept: Vec<PlantPosition> = positions
            .into_iter()
            .rev()
            .filter(|p| seen.insert(p.plant_id.clone()))
            .map(|p| PlantPosition::new(p.plant_id, p.bed_id, p.x, p.y))
            .collect();
        kept.reverse();
        Self { positions: kept }
    }

    #[must_use]
    pub fn positions(&self) -> &[PlantPosition] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn get(&self, plant: &PlantId) -> Option<&PlantPosition> {
        self.positions.iter().find(|p| &p.plant_id == plant)
    }

    #[must_use]
    pub fn is_placed(&self, plant: &PlantId) -> bool {
        self.get(plant).is_some()
    }

    /// Place (or move) a plant. Any earlier position for it is dropped.
    pub fn place(&mut self, plant: PlantId, bed: BedId, x: f64, y: f64) -> PlantPosition {
        self.positions.retain(|p| p.plant_id != plant);
        let position = PlantPosition::new(plant, bed, x, y);
        self.positions.push(position.clone());
        position
    }

    /// Remove a plant's position, returning it to the unplaced pool.
    pub fn remove_plant(&mut self, plant: &PlantId) -> Option<PlantPosition> {
        let index = self.positions.iter().position(|p| &p.plant_id == plant)?;
        Some(self.positions.remove(index))
    }

    /// Remove every position inside `bed`; returns how many were removed.
    pub fn remove_bed(&mut self, bed: &BedId) -> usize {
        self.retain(|p| &p.bed_id != bed)
    }

    /// Keep only positions matching `keep`; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&PlantPosition) -> bool) -> usize {
        let before = self.positions.len();
        self.positions.retain(|p| keep(p));
        before - self.positions.len()
    }

    /// Positions inside `bed`.
    pub fn in_bed<'a>(&'a self, bed: &'a BedId) -> impl Iterator<Item = &'a PlantPosition> + 'a {
        self.positions.iter().filter(move |p| &p.bed_id == bed)
    }

    /// Plants from `plants` that have no position.
    pub fn unplaced<'a, I>(&self, plants: I) -> Vec<&'a PlantId>
    where
        I: IntoIterator<Item = &'a PlantId>,
    {
        plants.into_iter().filter(|id| !self.is_placed(id)).collect()
    }

    #[must_use]
    pub fn into_positions(self) -> Vec<PlantPosition> {
        self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlantId {
        PlantId::new(s)
    }

    fn bid(s: &str) -> BedId {
        BedId::new(s)
    }

    #[test]
    fn placing_again_replaces() {
        let mut store = PositionStore::new();
        store.place(pid("p1"), bid("b1"), 0.2, 0.3);
        store.place(pid("p2"), bid("b1"), 0.5, 0.5);
        store.place(pid("p1"), bid("b2"), 0.9, 0.1);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(&pid("p1")),
            Some(&PlantPosition::new(pid("p1"), bid("b2"), 0.9, 0.1))
        );
        assert_eq!(store.positions().last().unwrap().plant_id, pid("p1"));
    }

    #[test]
    fn place_clamps_fractions() {
        let mut store = PositionStore::new();
        let pos = store.place(pid("p1"), bid("b1"), -0.2, 1.4);
        assert_eq!((pos.x, pos.y), (0.0, 1.0));
    }

    #[test]
    fn remove_bed_cascades() {
        let mut store = PositionStore::new();
        store.place(pid("p1"), bid("b1"), 0.1, 0.1);
        store.place(pid("p2"), bid("b1"), 0.2, 0.2);
        store.place(pid("p3"), bid("b2"), 0.3, 0.3);
        assert_eq!(store.remove_bed(&bid("b1")), 2);
        assert_eq!(store.in_bed(&bid("b1")).count(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unplaced_is_complement() {
        let mut store = PositionStore::new();
        store.place(pid("p2"), bid("b1"), 0.5, 0.5);
        let all = [pid("p1"), pid("p2"), pid("p3")];
        let unplaced = store.unplaced(all.iter());
        assert_eq!(unplaced, vec![&pid("p1"), &pid("p3")]);
        assert!(store.remove_plant(&pid("p2")).is_some());
        assert!(store.remove_plant(&pid("p2")).is_none());
        assert_eq!(store.unplaced(all.iter()).len(), 3);
    }

    #[test]
    fn load_dedupes_last_wins() {
        let store = PositionStore::from_positions(vec![
            PlantPosition {
                plant_id: pid("p1"),
                bed_id: bid("b1"),
                x: 0.1,
                y: 0.1,
            },
            PlantPosition {
                plant_id: pid("p2"),
                bed_id: bid("b1"),
                x: 7.0,
                y: -3.0,
            },
            PlantPosition {
                plant_id: pid("p1"),
                bed_id: bid("b2"),
                x: 0.4,
                y: 0.4,
            },
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&pid("p1")).unwrap().bed_id, bid("b2"));
        let p2 = store.get(&pid("p2")).unwrap();
        assert_eq!((p2.x, p2.y), (1.0, 0.0));
    }
}
