#![forbid(unsafe_code)]

//! Seasons and archived season reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plant::{Plant, PlantBook};

/// Season used when nothing has been stored yet.
pub const DEFAULT_SEASON: &str = "default";

/// Trimmed season name, or `None` when blank.
#[must_use]
pub fn normalize_season(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Snapshot of a season taken when a new one starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonReport {
    pub season: String,
    pub archived_at: DateTime<Utc>,
    pub plant_count: usize,
    pub total_harvest: f64,
    #[serde(default)]
    pub plants: Vec<Plant>,
}

impl SeasonReport {
    #[must_use]
    pub fn archive(season: &str, plants: &PlantBook, now: DateTime<Utc>) -> Self {
        Self {
            season: season.to_string(),
            archived_at: now,
            plant_count: plants.len(),
            total_harvest: plants.total_harvest(),
            plants: plants.plants().to_vec(),
        }
    }

    /// Heaviest-yielding plant, if any harvested.
    #[must_use]
    pub fn top_plant(&self) -> Option<&Plant> {
        self.plants
            .iter()
            .filter(|p| p.harvest_total > 0.0)
            .max_by(|a, b| a.harvest_total.total_cmp(&b.harvest_total))
    }
}
