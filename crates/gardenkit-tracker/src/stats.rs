#![forbid(unsafe_code)]

//! Aggregated numbers for the dashboard.

use std::collections::BTreeMap;

use gardenkit_layout::GardenLayout;
use gardenkit_layout::capacity::garden_capacity;
use serde::{Deserialize, Serialize};

use crate::plant::{PlantBook, PlantStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStats {
    pub total_plants: usize,
    pub by_status: BTreeMap<PlantStatus, usize>,
    /// Keyed by plant type as entered; blank types count as `"Other"`.
    pub by_type: BTreeMap<String, usize>,
    pub total_harvest: f64,
    pub placed_plants: usize,
    pub unplaced_plants: usize,
    pub bed_count: usize,
    pub overcrowded_beds: usize,
    /// Mean utilization across beds, `0` without beds.
    pub average_utilization_pct: f64,
}

impl GardenStats {
    #[must_use]
    pub fn compute(plants: &PlantBook, layout: &GardenLayout) -> Self {
        let mut by_status = BTreeMap::new();
        let mut by_type = BTreeMap::new();
        for plant in plants.plants() {
            *by_status.entry(plant.status).or_insert(0) += 1;
            let plant_type = match plant.plant_type.trim() {
                "" => "Other".to_string(),
                t => t.to_string(),
            };
            *by_type.entry(plant_type).or_insert(0) += 1;
        }

        let placed_plants = plants
            .plants()
            .iter()
            .filter(|p| layout.positions().is_placed(&p.id))
            .count();

        let capacity = garden_capacity(layout, plants);
        let average_utilization_pct = if capacity.is_empty() {
            0.0
        } else {
            capacity.iter().map(|c| c.utilization_pct).sum::<f64>() / capacity.len() as f64
        };

        Self {
            total_plants: plants.len(),
            by_status,
            by_type,
            total_harvest: plants.total_harvest(),
            placed_plants,
            unplaced_plants: plants.len() - placed_plants,
            bed_count: layout.beds().len(),
            overcrowded_beds: capacity.iter().filter(|c| c.overcrowded).count(),
            average_utilization_pct,
        }
    }

    #[must_use]
    pub fn count(&self, status: PlantStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
