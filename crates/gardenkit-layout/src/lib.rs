#![forbid(unsafe_code)]

//! Garden layout: beds on an integer grid, plants at fractional positions
//! inside beds.
//!
//! # Coordinate spaces
//!
//! ```text
//!  page pixels ──(CanvasGeometry)──▶ grid cells ──▶ GardenBed.position
//!       │
//!       └──(bed rect)──▶ [0,1]² fractions ──▶ PlantPosition.{x,y}
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`PlantPosition`] per plant; placing again replaces.
//! 2. Removing a bed removes every position that references it.
//! 3. Placed bed origins are clamped at placement time so the footprint
//!    fits the [`GardenBoundary`]; shrinking the boundary later does not move
//!    beds.
//! 4. Plant fractions are always within `[0, 1]`.

pub mod bed;
pub mod boundary;
pub mod capacity;
pub mod gesture;
pub mod layout;
pub mod placement;
pub mod position;

pub use bed::{BedDraft, BedRegistry, BedType, GardenBed};
pub use boundary::{DimensionInput, GardenBoundary};
pub use capacity::{BedCapacity, SpaceLookup, bed_capacity, garden_capacity};
pub use gesture::{
    ClickOutcome, ClickToPlace, DragCancelReason, DragEffect, DragMachine, DragNoopReason,
    DragState, HitTest, LayoutHitTest, TouchAdapter,
};
pub use layout::GardenLayout;
pub use placement::{
    CanvasGeometry, IgnoreReason, PlacementConfig, PlacementEngine, PlacementOutcome,
    PlacementRequest, PlacementSubject, PlacementTarget,
};
pub use position::{PlantPosition, PositionStore};
