#![forbid(unsafe_code)]

//! Plants and the per-season plant book.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use gardenkit_core::id::{IdAllocator, PlantId};
use gardenkit_layout::SpaceLookup;
use serde::{Deserialize, Serialize};

/// Space a plant takes when none is given, in area units.
pub const DEFAULT_SPACE_REQUIRED: f64 = 1.0;

/// Care status shown next to each plant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlantStatus {
    #[default]
    Healthy,
    NeedsCare,
    Critical,
}

impl PlantStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::NeedsCare => "needs-care",
            Self::Critical => "critical",
        }
    }
}

/// Days without water before a plant's status degrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareThresholds {
    pub needs_care_after_days: i64,
    pub critical_after_days: i64,
}

impl Default for CareThresholds {
    fn default() -> Self {
        Self {
            needs_care_after_days: 3,
            critical_after_days: 7,
        }
    }
}

impl CareThresholds {
    /// Status for a plant last cared for `days` ago.
    #[must_use]
    pub fn status_after(&self, days: i64) -> PlantStatus {
        if days >= self.critical_after_days {
            PlantStatus::Critical
        } else if days >= self.needs_care_after_days {
            PlantStatus::NeedsCare
        } else {
            PlantStatus::Healthy
        }
    }
}

/// A timestamped note on a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    /// Free text ("Tomato", "Basil").
    #[serde(rename = "type", default)]
    pub plant_type: String,
    pub planted_at: DateTime<Utc>,
    #[serde(default)]
    pub last_watered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_fertilized: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PlantStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub harvest_total: f64,
    #[serde(default = "default_space")]
    pub space_required: f64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

fn default_space() -> f64 {
    DEFAULT_SPACE_REQUIRED
}

impl Plant {
    /// The later of planting and the last watering.
    #[must_use]
    pub fn last_cared_for(&self) -> DateTime<Utc> {
        self.last_watered
            .map_or(self.planted_at, |watered| watered.max(self.planted_at))
    }
}

/// Fields for a new plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantDraft {
    pub name: String,
    pub plant_type: String,
    pub location: String,
    pub space_required: f64,
    /// Defaults to "now" when absent.
    pub planted_at: Option<DateTime<Utc>>,
}

impl PlantDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, plant_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plant_type: plant_type.into(),
            location: String::new(),
            space_required: DEFAULT_SPACE_REQUIRED,
            planted_at: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_space(mut self, space_required: f64) -> Self {
        self.space_required = space_required;
        self
    }

    #[must_use]
    pub fn planted(mut self, at: DateTime<Utc>) -> Self {
        self.planted_at = Some(at);
        self
    }
}

/// Partial update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantPatch {
    pub plant_type: Option<String>,
    pub location: Option<String>,
    pub space_required: Option<f64>,
    pub status: Option<PlantStatus>,
}

fn sanitize_space(space: f64) -> Option<f64> {
    (space.is_finite() && space >= 0.0).then_some(space)
}

/// The plants of one season, in creation order.
#[derive(Debug, Clone)]
pub struct PlantBook {
    plants: Vec<Plant>,
    ids: IdAllocator,
}

impl Default for PlantBook {
    fn default() -> Self {
        Self::from_plants(Vec::new())
    }
}

impl PartialEq for PlantBook {
    fn eq(&self, other: &Self) -> bool {
        self.plants == other.plants
    }
}

impl PlantBook {
    /// Adopt stored plants, dropping later duplicates of an id.
    #[must_use]
    pub fn from_plants(plants: Vec<Plant>) -> Self {
        let mut ids = IdAllocator::new("plant");
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(plants.len());
        for mut plant in plants {
            if !seen.insert(plant.id.clone()) {
                tracing::warn!(plant = %plant.id, "dropping plant with duplicate id");
                continue;
            }
            ids.observe(plant.id.as_str());
            plant.space_required =
                sanitize_space(plant.space_required).unwrap_or(DEFAULT_SPACE_REQUIRED);
            kept.push(plant);
        }
        Self { plants: kept, ids }
    }

    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PlantId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &PlantId) -> Option<&mut Plant> {
        self.plants.iter_mut().find(|p| &p.id == id)
    }

    fn next_id(&mut self) -> PlantId {
        let plants = &self.plants;
        PlantId::new(self.ids.allocate(|c| plants.iter().any(|p| p.id.as_str() == c)))
    }

    /// Add a plant. `None` when the trimmed name is empty.
    pub fn add(&mut self, draft: PlantDraft, now: DateTime<Utc>) -> Option<PlantId> {
        let name = draft.name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.plants.push(Plant {
            id: id.clone(),
            name: name.to_string(),
            plant_type: draft.plant_type.trim().to_string(),
            planted_at: draft.planted_at.unwrap_or(now),
            last_watered: None,
            last_fertilized: None,
            status: PlantStatus::Healthy,
            location: draft.location.trim().to_string(),
            harvest_total: 0.0,
            space_required: sanitize_space(draft.space_required).unwrap_or(DEFAULT_SPACE_REQUIRED),
            comments: Vec::new(),
        });
        tracing::debug!(plant = %id, "added plant");
        Some(id)
    }

    /// Record a watering; the plant is healthy again.
    pub fn water(&mut self, id: &PlantId, now: DateTime<Utc>) -> bool {
        let Some(plant) = self.get_mut(id) else {
            return false;
        };
        plant.last_watered = Some(now);
        plant.status = PlantStatus::Healthy;
        true
    }

    pub fn fertilize(&mut self, id: &PlantId, now: DateTime<Utc>) -> bool {
        let Some(plant) = self.get_mut(id) else {
            return false;
        };
        plant.last_fertilized = Some(now);
        true
    }

    /// Add `weight` to the plant's harvest total and return the new total.
    ///
    /// Non-positive or non-finite weights are rejected.
    pub fn harvest(&mut self, id: &PlantId, weight: f64) -> Option<f64> {
        if !(weight.is_finite() && weight > 0.0) {
            return None;
        }
        let plant = self.get_mut(id)?;
        plant.harvest_total += weight;
        Some(plant.harvest_total)
    }

    pub fn add_comment(&mut self, id: &PlantId, text: &str, now: DateTime<Utc>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(plant) = self.get_mut(id) else {
            return false;
        };
        plant.comments.push(Comment {
            text: text.to_string(),
            created_at: now,
        });
        true
    }

    /// Remove the comment at `index`.
    pub fn remove_comment(&mut self, id: &PlantId, index: usize) -> Option<Comment> {
        let plant = self.get_mut(id)?;
        (index < plant.comments.len()).then(|| plant.comments.remove(index))
    }

    /// Rename a plant. Blank names are ignored.
    pub fn rename(&mut self, id: &PlantId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(plant) => {
                plant.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Apply a partial update. An invalid space requirement rejects the
    /// whole patch.
    pub fn update(&mut self, id: &PlantId, patch: PlantPatch) -> bool {
        let space = match patch.space_required {
            Some(space) => match sanitize_space(space) {
                Some(space) => Some(space),
                None => return false,
            },
            None => None,
        };
        let Some(plant) = self.get_mut(id) else {
            return false;
        };
        if let Some(plant_type) = patch.plant_type {
            plant.plant_type = plant_type.trim().to_string();
        }
        if let Some(location) = patch.location {
            plant.location = location.trim().to_string();
        }
        if let Some(space) = space {
            plant.space_required = space;
        }
        if let Some(status) = patch.status {
            plant.status = status;
        }
        true
    }

    /// Delete a plant. Callers owning positions must cascade.
    pub fn remove(&mut self, id: &PlantId) -> Option<Plant> {
        let index = self.plants.iter().position(|p| &p.id == id)?;
        Some(self.plants.remove(index))
    }

    /// Copy a plant under a new name.
    ///
    /// The copy gets a fresh id, is planted `now`, and starts with no
    /// harvest and no comments. Everything else is carried over.
    pub fn duplicate(&mut self, id: &PlantId, name: &str, now: DateTime<Utc>) -> Option<PlantId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let source = self.get(id)?.clone();
        let new_id = self.next_id();
        self.plants.push(Plant {
            id: new_id.clone(),
            name: name.to_string(),
            planted_at: now,
            harvest_total: 0.0,
            comments: Vec::new(),
            ..source
        });
        tracing::debug!(source = %id, plant = %new_id, "duplicated plant");
        Some(new_id)
    }

    /// Re-derive every status from time since last care; returns how many
    /// changed.
    pub fn refresh_statuses(&mut self, now: DateTime<Utc>, thresholds: &CareThresholds) -> usize {
        let mut changed = 0;
        for plant in &mut self.plants {
            let days = (now - plant.last_cared_for()).num_days();
            let status = thresholds.status_after(days);
            if status != plant.status {
                plant.status = status;
                changed += 1;
            }
        }
        changed
    }

    /// Sum of every plant's harvest.
    #[must_use]
    pub fn total_harvest(&self) -> f64 {
        self.plants.iter().map(|p| p.harvest_total).sum()
    }

    #[must_use]
    pub fn into_plants(self) -> Vec<Plant> {
        self.plants
    }
}

impl SpaceLookup for PlantBook {
    fn space_required(&self, plant: &PlantId) -> Option<f64> {
        self.get(plant).map(|p| p.space_required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn add_rejects_blank_names_and_bad_space() {
        let mut book = PlantBook::default();
        assert!(book.add(PlantDraft::new("   ", "Tomato"), t0()).is_none());
        let id = book
            .add(PlantDraft::new(" Tomato ", "Tomato").with_space(f64::NAN), t0())
            .unwrap();
        let plant = book.get(&id).unwrap();
        assert_eq!(plant.name, "Tomato");
        assert_eq!(plant.space_required, DEFAULT_SPACE_REQUIRED);
        assert_eq!(plant.planted_at, t0());
    }

    #[test]
    fn harvest_accumulates_and_rejects_bad_weights() {
        let mut book = PlantBook::default();
        let id = book.add(PlantDraft::new("Tomato", "Tomato"), t0()).unwrap();
        assert_eq!(book.harvest(&id, 2.5), Some(2.5));
        assert_eq!(book.harvest(&id, 1.0), Some(3.5));
        assert_eq!(book.harvest(&id, 0.0), None);
        assert_eq!(book.harvest(&id, -1.0), None);
        assert_eq!(book.harvest(&id, f64::INFINITY), None);
        assert_eq!(book.total_harvest(), 3.5);
    }

    #[test]
    fn duplicate_resets_history() {
        let mut book = PlantBook::default();
        let id = book
            .add(PlantDraft::new("Tomato", "Tomato").with_location("Bed A").with_space(2.0), t0())
            .unwrap();
        book.harvest(&id, 5.0);
        book.add_comment(&id, "first fruit", t0());
        book.water(&id, t0() + Duration::days(1));

        let later = t0() + Duration::days(10);
        let copy = book.duplicate(&id, "Tomato Copy", later).unwrap();
        let copy = book.get(&copy).unwrap();
        assert_ne!(copy.id, id);
        assert_eq!(copy.name, "Tomato Copy");
        assert_eq!(copy.harvest_total, 0.0);
        assert!(copy.comments.is_empty());
        assert_eq!(copy.planted_at, later);
        assert_eq!(copy.location, "Bed A");
        assert_eq!(copy.space_required, 2.0);
        assert_eq!(copy.plant_type, "Tomato");
        assert!(book.duplicate(&id, "  ", later).is_none());
    }

    #[test]
    fn statuses_follow_care_thresholds() {
        let mut book = PlantBook::default();
        let id = book.add(PlantDraft::new("Basil", "Herb"), t0()).unwrap();
        let thresholds = CareThresholds::default();

        assert_eq!(book.refresh_statuses(t0() + Duration::days(2), &thresholds), 0);
        assert_eq!(book.refresh_statuses(t0() + Duration::days(3), &thresholds), 1);
        assert_eq!(book.get(&id).unwrap().status, PlantStatus::NeedsCare);
        book.refresh_statuses(t0() + Duration::days(7), &thresholds);
        assert_eq!(book.get(&id).unwrap().status, PlantStatus::Critical);

        book.water(&id, t0() + Duration::days(7));
        assert_eq!(book.get(&id).unwrap().status, PlantStatus::Healthy);
        book.refresh_statuses(t0() + Duration::days(8), &thresholds);
        assert_eq!(book.get(&id).unwrap().status, PlantStatus::Healthy);
    }

    #[test]
    fn update_and_rename() {
        let mut book = PlantBook::default();
        let id = book.add(PlantDraft::new("Pepper", "Pepper"), t0()).unwrap();
        assert!(!book.rename(&id, " "));
        assert!(book.rename(&id, "Hot Pepper"));
        assert!(!book.update(&id, PlantPatch {
            space_required: Some(-2.0),
            location: Some("nowhere".into()),
            ..PlantPatch::default()
        }));
        assert_eq!(book.get(&id).unwrap().location, "");
        assert!(book.update(&id, PlantPatch {
            location: Some("South bed".into()),
            status: Some(PlantStatus::Critical),
            ..PlantPatch::default()
        }));
        let plant = book.get(&id).unwrap();
        assert_eq!((plant.name.as_str(), plant.location.as_str()), ("Hot Pepper", "South bed"));
        assert_eq!(plant.status, PlantStatus::Critical);
    }

    #[test]
    fn comments_need_text() {
        let mut book = PlantBook::default();
        let id = book.add(PlantDraft::new("Kale", "Kale"), t0()).unwrap();
        assert!(!book.add_comment(&id, "  ", t0()));
        assert!(book.add_comment(&id, "aphids", t0()));
        assert_eq!(book.remove_comment(&id, 3), None);
        assert_eq!(book.remove_comment(&id, 0).map(|c| c.text), Some("aphids".to_string()));
    }

    #[test]
    fn stored_json_uses_kebab_status_and_type_field() {
        let json = r#"[{"id":"plant-4","name":"Mint","type":"Herb","plantedAt":"2024-04-01T09:00:00Z","status":"needs-care","spaceRequired":-3}]"#;
        let book = PlantBook::from_plants(serde_json::from_str(json).unwrap());
        let plant = book.get(&PlantId::new("plant-4")).unwrap();
        assert_eq!(plant.status, PlantStatus::NeedsCare);
        assert_eq!(plant.plant_type, "Herb");
        assert_eq!(plant.space_required, DEFAULT_SPACE_REQUIRED);

        let mut book = book;
        let next = book.add(PlantDraft::new("Sage", "Herb"), t0()).unwrap();
        assert_eq!(next.as_str(), "plant-5");
    }
}
