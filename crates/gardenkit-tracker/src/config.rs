#![forbid(unsafe_code)]

//! Garden configuration with environment overrides.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `GARDENKIT_NAMESPACE` | `namespace` | `garden` |
//! | `GARDENKIT_GRID_CELL_PX` | `placement.grid_cell_px` | `40` |
//! | `GARDENKIT_BULK_COLUMNS` | `placement.bulk_columns` | `6` |
//! | `GARDENKIT_DRAG_THRESHOLD` | `placement.drag_threshold_px` | `4` |
//! | `GARDENKIT_SEASON` | `default_season` | `default` |
//!
//! Values that fail to parse are logged and the default is kept.

use std::fmt;
use std::str::FromStr;

use gardenkit_layout::{GardenBoundary, PlacementConfig};

use crate::plant::CareThresholds;
use crate::season::DEFAULT_SEASON;

pub const ENV_NAMESPACE: &str = "GARDENKIT_NAMESPACE";
pub const ENV_GRID_CELL_PX: &str = "GARDENKIT_GRID_CELL_PX";
pub const ENV_BULK_COLUMNS: &str = "GARDENKIT_BULK_COLUMNS";
pub const ENV_DRAG_THRESHOLD: &str = "GARDENKIT_DRAG_THRESHOLD";
pub const ENV_SEASON: &str = "GARDENKIT_SEASON";

/// An environment override that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value {value:?} for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything a [`Garden`](crate::Garden) needs besides storage and a clock.
#[derive(Debug, Clone, PartialEq)]
pub struct GardenConfig {
    /// Storage key prefix.
    pub namespace: String,
    pub placement: PlacementConfig,
    /// Boundary used when none is stored.
    pub default_boundary: GardenBoundary,
    pub care: CareThresholds,
    /// Season used when no active season is stored.
    pub default_season: String,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            namespace: "garden".to_string(),
            placement: PlacementConfig::default(),
            default_boundary: GardenBoundary::default(),
            care: CareThresholds::default(),
            default_season: DEFAULT_SEASON.to_string(),
        }
    }
}

impl GardenConfig {
    /// Defaults with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, errors) = Self::parse_env(get_env);
        for error in &errors {
            tracing::warn!(error = %error, "ignoring config override");
        }
        config
    }

    /// Apply overrides, returning the config and every rejected override.
    pub fn parse_env<F>(get_env: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(ns) = get_env(ENV_NAMESPACE) {
            let ns = ns.trim();
            if ns.is_empty() {
                errors.push(invalid(ENV_NAMESPACE, ns, "must not be blank"));
            } else {
                config.namespace = ns.to_string();
            }
        }
        if let Some(px) = env_parse::<f64>(&get_env, ENV_GRID_CELL_PX, &mut errors) {
            if px.is_finite() && px > 0.0 {
                config.placement.grid_cell_px = px;
            } else {
                errors.push(invalid(ENV_GRID_CELL_PX, &px.to_string(), "must be positive"));
            }
        }
        if let Some(cols) = env_parse::<u32>(&get_env, ENV_BULK_COLUMNS, &mut errors) {
            if cols > 0 {
                config.placement.bulk_columns = cols;
            } else {
                errors.push(invalid(ENV_BULK_COLUMNS, "0", "must be at least 1"));
            }
        }
        if let Some(px) = env_parse::<f64>(&get_env, ENV_DRAG_THRESHOLD, &mut errors) {
            if px.is_finite() && px >= 0.0 {
                config.placement.drag_threshold_px = px;
            } else {
                errors.push(invalid(ENV_DRAG_THRESHOLD, &px.to_string(), "must be non-negative"));
            }
        }
        if let Some(season) = get_env(ENV_SEASON) {
            match crate::season::normalize_season(&season) {
                Some(season) => config.default_season = season,
                None => errors.push(invalid(ENV_SEASON, &season, "must not be blank")),
            }
        }
        (config, errors)
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_default_boundary(mut self, boundary: GardenBoundary) -> Self {
        self.default_boundary = boundary;
        self
    }

    #[must_use]
    pub fn with_care(mut self, care: CareThresholds) -> Self {
        self.care = care;
        self
    }

    #[must_use]
    pub fn with_default_season(mut self, season: impl Into<String>) -> Self {
        self.default_season = season.into();
        self
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

fn env_parse<T: FromStr>(
    get_env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    errors: &mut Vec<ConfigError>,
) -> Option<T> {
    let raw = get_env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(invalid(key, &raw, "not a number"));
            None
        }
    }
}
