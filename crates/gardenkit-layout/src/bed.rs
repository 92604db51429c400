#![forbid(unsafe_code)]

//! Garden beds and the bed registry.

use std::collections::HashSet;

use gardenkit_core::geometry::{GridPosition, GridSize};
use gardenkit_core::id::{BedId, IdAllocator};
use serde::{Deserialize, Serialize};

use crate::boundary::GardenBoundary;
use crate::placement::clamp_bed_origin;

/// Upper bound on beds created by one bulk request.
pub const MAX_BULK_BEDS: u32 = 100;

/// Construction style of a bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedType {
    #[default]
    Raised,
    Ground,
    Container,
}

/// A rectangular bed measured in grid units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenBed {
    pub id: BedId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Grid origin; [`GridPosition::UNPLACED`] until dropped on the canvas.
    #[serde(default)]
    pub position: GridPosition,
    #[serde(rename = "type", default)]
    pub bed_type: BedType,
}

impl GardenBed {
    /// Create an unplaced raised bed.
    #[must_use]
    pub fn new(id: BedId, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            position: GridPosition::UNPLACED,
            bed_type: BedType::Raised,
        }
    }

    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Planting area in area units.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.size().area()
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.position.is_placed()
    }
}

/// A bed as entered in the creation form, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedDraft {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub bed_type: BedType,
    /// Explicit grid origin; `None` leaves the bed unplaced.
    pub position: Option<GridPosition>,
}

impl BedDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            bed_type: BedType::default(),
            position: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, bed_type: BedType) -> Self {
        self.bed_type = bed_type;
        self
    }

    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some(GridPosition::new(x, y));
        self
    }
}

/// In-memory list of beds, in creation order.
#[derive(Debug, Clone)]
pub struct BedRegistry {
    beds: Vec<GardenBed>,
    ids: IdAllocator,
}

impl Default for BedRegistry {
    fn default() -> Self {
        Self::from_beds(Vec::new())
    }
}

impl PartialEq for BedRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.beds == other.beds
    }
}

impl BedRegistry {
    /// Adopt stored beds. Later beds with a duplicate id are dropped.
    ///
    /// A stored origin with a negative coordinate other than the
    /// [`GridPosition::UNPLACED`] sentinel is clamped to `>= 0`.
    #[must_use]
    pub fn from_beds(beds: Vec<GardenBed>) -> Self {
        let mut ids = IdAllocator::new("bed");
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(beds.len());
        for mut bed in beds {
            if !seen.insert(bed.id.clone()) {
                tracing::warn!(bed = %bed.id, "dropping bed with duplicate id");
                continue;
            }
            if bed.is_placed() && (bed.position.x < 0 || bed.position.y < 0) {
                tracing::warn!(
                    bed = %bed.id,
                    x = bed.position.x,
                    y = bed.position.y,
                    "clamping stored bed origin"
                );
                bed.position = GridPosition::new(bed.position.x.max(0), bed.position.y.max(0));
            }
            ids.observe(bed.id.as_str());
            kept.push(bed);
        }
        Self { beds: kept, ids }
    }

    /// The two example beds shown on first run.
    #[must_use]
    pub fn with_example_beds() -> Self {
        let mut registry = Self::default();
        registry.add(BedDraft::new("Vegetable Bed", 4, 2).at(0, 0));
        registry.add(
            BedDraft::new("Herb Planter", 2, 2)
                .with_type(BedType::Container)
                .at(5, 0),
        );
        registry
    }

    #[must_use]
    pub fn beds(&self) -> &[GardenBed] {
        &self.beds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.beds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beds.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &BedId) -> Option<&GardenBed> {
        self.beds.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &BedId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &BedId) -> Option<&mut GardenBed> {
        self.beds.iter_mut().find(|b| &b.id == id)
    }

    fn next_id(&mut self) -> BedId {
        let beds = &self.beds;
        BedId::new(self.ids.allocate(|c| beds.iter().any(|b| b.id.as_str() == c)))
    }

    /// Add one bed. Returns `None` when the trimmed name is empty.
    ///
    /// Dimensions below 1 are raised to 1; explicit coordinates are clamped
    /// to `>= 0`.
    pub fn add(&mut self, draft: BedDraft) -> Option<BedId> {
        self.add_within(draft, None)
    }

    /// [`add`](Self::add), additionally clamping an explicit origin so the
    /// footprint fits inside `bounds` (see [`clamp_bed_origin`]).
    pub fn add_within(
        &mut self,
        draft: BedDraft,
        bounds: Option<&GardenBoundary>,
    ) -> Option<BedId> {
        let name = draft.name.trim();
        if name.is_empty() {
            return None;
        }
        let size = GridSize::new(draft.width.max(1), draft.height.max(1));
        let position = match draft.position {
            Some(p) if p.is_placed() => {
                clamp_bed_origin(i64::from(p.x), i64::from(p.y), size, bounds)
            }
            _ => GridPosition::UNPLACED,
        };
        let id = self.next_id();
        self.beds.push(GardenBed {
            id: id.clone(),
            name: name.to_string(),
            width: size.width,
            height: size.height,
            position,
            bed_type: draft.bed_type,
        });
        tracing::debug!(bed = %id, "added bed");
        Some(id)
    }

    /// Add `quantity` copies of `draft`.
    ///
    /// With `quantity <= 1` this is [`add`](Self::add). Otherwise beds are
    /// named `"{name} 1"` … `"{name} N"` and each is given the next free
    /// grid cell in a row-major scan `columns` wide. Cells taken by existing
    /// placed beds are skipped; existing beds never move.
    ///
    /// Only origin cells are tracked. Footprints of multi-cell beds are not
    /// considered, so neighbouring beds may overlap, and cells are not
    /// clamped to the garden boundary.
    pub fn add_bulk(&mut self, draft: BedDraft, quantity: u32, columns: u32) -> Vec<BedId> {
        if quantity <= 1 {
            return self.add(draft).into_iter().collect();
        }
        let base = draft.name.trim().to_string();
        if base.is_empty() {
            return Vec::new();
        }
        let quantity = quantity.min(MAX_BULK_BEDS);
        let columns = i64::from(columns.max(1));

        let mut occupied: HashSet<GridPosition> = self
            .beds
            .iter()
            .filter(|b| b.is_placed())
            .map(|b| b.position)
            .collect();
        let mut cursor: i64 = 0;
        let mut created = Vec::with_capacity(quantity as usize);

        for n in 1..=quantity {
            let cell = loop {
                let candidate = GridPosition::new(
                    i32::try_from(cursor % columns).unwrap_or(i32::MAX),
                    i32::try_from(cursor / columns).unwrap_or(i32::MAX),
                );
                cursor += 1;
                if !occupied.contains(&candidate) {
                    break candidate;
                }
            };
            occupied.insert(cell);

            let bed = BedDraft {
                name: format!("{base} {n}"),
                position: Some(cell),
                ..draft.clone()
            };
            if let Some(id) = self.add(bed) {
                created.push(id);
            }
        }
        tracing::debug!(count = created.len(), name = %base, "bulk-created beds");
        created
    }

    /// Remove a bed. Callers owning positions must cascade; see
    /// [`GardenLayout::remove_bed`](crate::GardenLayout::remove_bed).
    pub fn remove(&mut self, id: &BedId) -> Option<GardenBed> {
        let index = self.beds.iter().position(|b| &b.id == id)?;
        Some(self.beds.remove(index))
    }

    /// Rename a bed. Blank names are ignored and return `false`.
    pub fn rename(&mut self, id: &BedId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(bed) => {
                bed.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Move a bed to `(x, y)`, clamped per [`clamp_bed_origin`].
    pub fn reposition(
        &mut self,
        id: &BedId,
        x: i64,
        y: i64,
        bounds: Option<&GardenBoundary>,
    ) -> Option<GridPosition> {
        let bed = self.get_mut(id)?;
        bed.position = clamp_bed_origin(x, y, bed.size(), bounds);
        Some(bed.position)
    }

    /// Consume the registry, returning the beds for storage.
    #[must_use]
    pub fn into_beds(self) -> Vec<GardenBed> {
        self.beds
    }
}
