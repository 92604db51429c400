#![forbid(unsafe_code)]

//! Garden tracking on top of the layout engine.
//!
//! [`Garden`] owns the active season's plants, positions and ledger plus
//! the global bed registry, and mirrors every change to a
//! [`StorageBackend`](gardenkit_store::StorageBackend) through
//! [`GardenRepository`].
//!
//! # Example
//!
//! ```
//! use gardenkit_core::id::BedId;
//! use gardenkit_tracker::{Garden, GardenConfig, PlantDraft};
//!
//! let mut garden = Garden::in_memory(GardenConfig::default());
//! let tomato = garden.add_plant(PlantDraft::new("Tomato", "Tomato").with_space(3.0)).unwrap();
//! garden.place_plant(&tomato, &BedId::new("bed-1"), 0.5, 0.5).unwrap();
//! garden.harvest_plant(&tomato, 1.2);
//!
//! assert_eq!(garden.stats().placed_plants, 1);
//! assert!(garden.unplaced_plants().is_empty());
//! ```

pub mod config;
pub mod economics;
pub mod edit;
pub mod garden;
pub mod plant;
pub mod repository;
pub mod season;
pub mod stats;

pub use config::{ConfigError, GardenConfig};
pub use economics::{
    EconomicsSettings, EconomicsSummary, Expense, ExpenseCategory, Ledger, ProducePrices,
    TimeEntry, UnitSystem,
};
pub use edit::{EditKey, EditOutcome, InlineEdit};
pub use garden::Garden;
pub use plant::{CareThresholds, Comment, Plant, PlantBook, PlantDraft, PlantPatch, PlantStatus};
pub use repository::GardenRepository;
pub use season::{DEFAULT_SEASON, SeasonReport};
pub use stats::GardenStats;
