#![forbid(unsafe_code)]

//! gardenkit public facade crate.
//!
//! Re-exports the garden service, the layout engine and the storage layer
//! from the internal crates and offers a prelude for day-to-day usage.
//!
//! ```
//! use gardenkit::prelude::*;
//!
//! let mut garden = Garden::in_memory(GardenConfig::default());
//! let basil = garden.add_plant(PlantDraft::new("Basil", "Herb")).unwrap();
//! garden.place_plant(&basil, &BedId::new("bed-2"), 0.5, 0.5).unwrap();
//! assert_eq!(garden.stats().placed_plants, 1);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use gardenkit_core::clock::{Clock, ManualClock, SystemClock};
pub use gardenkit_core::event::{
    InputEvent, KeyCode, KeyInput, Modifiers, PointerInput, PointerPhase, TouchInput,
    TouchPhase, TouchPoint,
};
pub use gardenkit_core::geometry::{GridPosition, GridSize, Point, Rect};
pub use gardenkit_core::id::{BedId, PlantId};

// --- Layout re-exports -----------------------------------------------------

pub use gardenkit_layout::{
    BedCapacity, BedDraft, BedRegistry, BedType, CanvasGeometry, ClickOutcome, ClickToPlace,
    DragCancelReason, DragEffect, DragMachine, DragState, GardenBed, GardenBoundary,
    GardenLayout, HitTest, LayoutHitTest, PlacementConfig, PlacementEngine, PlacementOutcome,
    PlacementRequest, PlacementSubject, PlacementTarget, PlantPosition, PositionStore,
    TouchAdapter,
};

// --- Store re-exports ------------------------------------------------------

#[cfg(feature = "file-storage")]
pub use gardenkit_store::FileStorage;
pub use gardenkit_store::{KeyScheme, MemoryStorage, StorageBackend, StorageError};

// --- Tracker re-exports ----------------------------------------------------

pub use gardenkit_tracker::{
    ConfigError, EconomicsSettings, EconomicsSummary, EditKey, EditOutcome, Expense,
    ExpenseCategory, Garden, GardenConfig, GardenStats, InlineEdit, Plant, PlantDraft,
    PlantPatch, PlantStatus, SeasonReport, UnitSystem,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gardenkit hosts.
#[derive(Debug)]
pub enum Error {
    /// A storage backend failed.
    Storage(StorageError),
    /// An environment variable held an unusable value.
    Config(ConfigError),
    /// A global subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for gardenkit APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Read the configuration from the process environment, failing on the
/// first unusable value instead of falling back.
pub fn strict_config() -> Result<GardenConfig> {
    strict_config_with(|key| std::env::var(key).ok())
}

/// [`strict_config`] with an injectable lookup.
pub fn strict_config_with<F>(get_env: F) -> Result<GardenConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (config, errors) = GardenConfig::parse_env(get_env);
    match errors.into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(config),
    }
}

// --- Logging --------------------------------------------------------------

/// Subscriber setup for binaries and demos.
#[cfg(feature = "logging")]
pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// Environment variable holding the `EnvFilter` directives.
    pub const ENV_LOG: &str = "GARDENKIT_LOG";

    /// Directives used when [`ENV_LOG`] is unset or unparsable.
    pub const DEFAULT_DIRECTIVES: &str = "info";

    /// Build the filter from [`ENV_LOG`].
    #[must_use]
    pub fn env_filter() -> EnvFilter {
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
    }

    /// Install a global fmt subscriber.
    pub fn try_init() -> crate::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .try_init()
            .map_err(|err| crate::Error::Logging(err.to_string()))
    }

    /// Like [`try_init`], ignoring an already installed subscriber.
    pub fn init() {
        if let Err(err) = try_init() {
            tracing::debug!(%err, "subscriber already installed");
        }
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BedDraft, BedId, ClickOutcome, ClickToPlace, DragEffect, DragMachine, Error, Garden,
        GardenConfig, InputEvent, MemoryStorage, PlacementOutcome, PlacementRequest, PlantDraft,
        PlantId, PlantStatus, Point, Result, StorageBackend, TouchAdapter,
    };

    pub use crate::{core, layout, store, tracker};
}

pub use gardenkit_core as core;
pub use gardenkit_layout as layout;
pub use gardenkit_store as store;
pub use gardenkit_tracker as tracker;
