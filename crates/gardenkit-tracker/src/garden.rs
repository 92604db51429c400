#![forbid(unsafe_code)]

//! The `Garden` service: in-memory state for the active season, mirrored to
//! storage on every change.
//!
//! # Ownership
//!
//! ```text
//! global:      beds, boundary, season reports, active season,
//!              economics settings, produce prices
//! per season:  plants, positions, expenses, time entries
//! ```
//!
//! Every mutating method updates memory first, then writes the affected
//! keys. A failed write is logged by the store and otherwise ignored; the
//! in-memory state stays authoritative for the rest of the session.

use std::sync::Arc;

use gardenkit_core::clock::{Clock, SystemClock};
use gardenkit_core::geometry::{GridPosition, Rect};
use gardenkit_core::id::{BedId, PlantId};
use gardenkit_layout::capacity::{bed_capacity, garden_capacity};
use gardenkit_layout::placement::IgnoreReason;
use gardenkit_layout::{
    BedCapacity, BedDraft, CanvasGeometry, DimensionInput, GardenBed, GardenBoundary,
    GardenLayout, LayoutHitTest, PlacementEngine, PlacementOutcome, PlacementRequest,
    PlacementSubject, PlantPosition, PositionStore,
};
use gardenkit_store::{KeyScheme, MemoryStorage, StorageBackend, TypedStore};

use crate::config::GardenConfig;
use crate::economics::{EconomicsSettings, EconomicsSummary, ExpenseCategory, Ledger, ProducePrices};
use crate::edit::{EditKey, EditOutcome};
use crate::plant::{Plant, PlantBook, PlantDraft, PlantPatch};
use crate::repository::GardenRepository;
use crate::season::{SeasonReport, normalize_season};
use crate::stats::GardenStats;

pub struct Garden {
    repo: GardenRepository,
    clock: Arc<dyn Clock>,
    config: GardenConfig,
    season: String,
    layout: GardenLayout,
    plants: PlantBook,
    ledger: Ledger,
    reports: Vec<SeasonReport>,
    settings: EconomicsSettings,
    prices: ProducePrices,
    engine: PlacementEngine,
    removal_zone: Option<Rect>,
}

impl Garden {
    /// Load the garden stored in `backend`.
    #[must_use]
    pub fn open(backend: Arc<dyn StorageBackend>, config: GardenConfig) -> Self {
        Self::open_with_clock(backend, config, Arc::new(SystemClock))
    }

    /// A garden backed by process memory only.
    #[must_use]
    pub fn in_memory(config: GardenConfig) -> Self {
        Self::open(Arc::new(MemoryStorage::new()), config)
    }

    #[must_use]
    pub fn open_with_clock(
        backend: Arc<dyn StorageBackend>,
        config: GardenConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let repo = GardenRepository::new(
            TypedStore::new(backend),
            KeyScheme::new(config.namespace.clone()),
        );
        let season = repo.load_active_season(&config.default_season);
        let plants = repo.load_plants(&season);
        let mut layout = GardenLayout::new(
            repo.load_beds(),
            repo.load_positions(&season),
            repo.load_boundary(config.default_boundary),
        );
        let dangling = layout.prune(|id| plants.contains(id));
        if dangling > 0 {
            tracing::warn!(season = %season, dangling, "dropped positions of missing plants");
        }
        let engine = PlacementEngine::new(CanvasGeometry::new(Rect::default(), config.placement));

        tracing::info!(
            season = %season,
            backend = repo.store().backend_name(),
            beds = layout.beds().len(),
            plants = plants.len(),
            "opened garden"
        );
        Self {
            ledger: repo.load_ledger(&season),
            reports: repo.load_reports(),
            settings: repo.load_settings(),
            prices: repo.load_prices(),
            repo,
            clock,
            config,
            season,
            layout,
            plants,
            engine,
            removal_zone: None,
        }
    }

    // ── accessors ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    #[must_use]
    pub fn season(&self) -> &str {
        &self.season
    }

    #[must_use]
    pub fn layout(&self) -> &GardenLayout {
        &self.layout
    }

    #[must_use]
    pub fn plants(&self) -> &PlantBook {
        &self.plants
    }

    #[must_use]
    pub fn plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.get(id)
    }

    #[must_use]
    pub fn bed(&self, id: &BedId) -> Option<&GardenBed> {
        self.layout.beds().get(id)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Archived seasons, oldest first.
    #[must_use]
    pub fn season_reports(&self) -> &[SeasonReport] {
        &self.reports
    }

    #[must_use]
    pub fn economics_settings(&self) -> &EconomicsSettings {
        &self.settings
    }

    #[must_use]
    pub fn produce_prices(&self) -> &ProducePrices {
        &self.prices
    }

    #[must_use]
    pub fn placement_engine(&self) -> &PlacementEngine {
        &self.engine
    }

    // ── persistence ─────────────────────────────────────────────────────────

    fn persist_beds(&self) {
        self.repo.save_beds(self.layout.beds());
    }

    fn persist_positions(&self) {
        self.repo.save_positions(&self.season, self.layout.positions());
    }

    fn persist_plants(&self) {
        self.repo.save_plants(&self.season, &self.plants);
    }

    fn persist_boundary(&self) {
        self.repo.save_boundary(self.layout.boundary());
    }

    fn persist_ledger(&self) {
        self.repo.save_expenses(&self.season, &self.ledger);
        self.repo.save_time_entries(&self.season, &self.ledger);
    }

    // ── beds ────────────────────────────────────────────────────────────────

    pub fn add_bed(&mut self, draft: BedDraft) -> Option<BedId> {
        let id = self.layout.add_bed(draft)?;
        self.persist_beds();
        Some(id)
    }

    /// Add `quantity` beds, auto-placed `bulk_columns` per row.
    pub fn add_beds(&mut self, draft: BedDraft, quantity: u32) -> Vec<BedId> {
        let created = self
            .layout
            .add_beds(draft, quantity, self.config.placement.bulk_columns);
        if !created.is_empty() {
            self.persist_beds();
        }
        created
    }

    /// Delete a bed and every plant position inside it.
    pub fn remove_bed(&mut self, id: &BedId) -> Option<GardenBed> {
        let bed = self.layout.remove_bed(id)?;
        self.persist_beds();
        self.persist_positions();
        Some(bed)
    }

    pub fn rename_bed(&mut self, id: &BedId, name: &str) -> bool {
        let renamed = self.layout.rename_bed(id, name);
        if renamed {
            self.persist_beds();
        }
        renamed
    }

    pub fn move_bed(&mut self, id: &BedId, x: i64, y: i64) -> Option<GridPosition> {
        let position = self.layout.move_bed(id, x, y)?;
        self.persist_beds();
        Some(position)
    }

    // ── boundary ────────────────────────────────────────────────────────────

    /// Resize the garden. Sides are clamped; beds are not moved.
    pub fn set_boundary_size(&mut self, width: u32, height: u32) -> GardenBoundary {
        let boundary = GardenBoundary {
            show_boundary: self.layout.boundary().show_boundary,
            ..GardenBoundary::new(width, height)
        };
        self.layout.set_boundary(boundary);
        self.persist_boundary();
        *self.layout.boundary()
    }

    pub fn set_show_boundary(&mut self, show: bool) {
        let boundary = GardenBoundary {
            show_boundary: show,
            ..*self.layout.boundary()
        };
        self.layout.set_boundary(boundary);
        self.persist_boundary();
    }

    /// Editable inputs seeded with the current width and height.
    #[must_use]
    pub fn boundary_inputs(&self) -> (DimensionInput, DimensionInput) {
        let boundary = self.layout.boundary();
        (DimensionInput::new(boundary.width), DimensionInput::new(boundary.height))
    }

    /// Commit both dimension inputs (as on blur) and apply the result.
    pub fn commit_boundary_inputs(
        &mut self,
        width: &mut DimensionInput,
        height: &mut DimensionInput,
    ) -> GardenBoundary {
        let (w, h) = (width.blur(), height.blur());
        self.set_boundary_size(w, h)
    }

    // ── plants ──────────────────────────────────────────────────────────────

    pub fn add_plant(&mut self, draft: PlantDraft) -> Option<PlantId> {
        let id = self.plants.add(draft, self.clock.now())?;
        self.persist_plants();
        Some(id)
    }

    pub fn water_plant(&mut self, id: &PlantId) -> bool {
        self.mutate_plants(|plants, now| plants.water(id, now))
    }

    pub fn fertilize_plant(&mut self, id: &PlantId) -> bool {
        self.mutate_plants(|plants, now| plants.fertilize(id, now))
    }

    /// Record a harvest; returns the plant's new total.
    pub fn harvest_plant(&mut self, id: &PlantId, weight: f64) -> Option<f64> {
        let total = self.plants.harvest(id, weight)?;
        self.persist_plants();
        Some(total)
    }

    pub fn comment_on_plant(&mut self, id: &PlantId, text: &str) -> bool {
        self.mutate_plants(|plants, now| plants.add_comment(id, text, now))
    }

    pub fn rename_plant(&mut self, id: &PlantId, name: &str) -> bool {
        self.mutate_plants(|plants, _| plants.rename(id, name))
    }

    pub fn update_plant(&mut self, id: &PlantId, patch: PlantPatch) -> bool {
        self.mutate_plants(|plants, _| plants.update(id, patch))
    }

    /// Copy a plant under `name`; see [`PlantBook::duplicate`].
    pub fn duplicate_plant(&mut self, id: &PlantId, name: &str) -> Option<PlantId> {
        let copy = self.plants.duplicate(id, name, self.clock.now())?;
        self.persist_plants();
        Some(copy)
    }

    /// Delete a plant and its position.
    pub fn remove_plant(&mut self, id: &PlantId) -> Option<Plant> {
        let plant = self.plants.remove(id)?;
        self.persist_plants();
        if self.layout.unplace_plant(id).is_some() {
            self.persist_positions();
        }
        tracing::debug!(plant = %id, "removed plant");
        Some(plant)
    }

    /// Re-derive care statuses from the clock; returns how many changed.
    pub fn refresh_statuses(&mut self) -> usize {
        let changed = self
            .plants
            .refresh_statuses(self.clock.now(), &self.config.care);
        if changed > 0 {
            self.persist_plants();
        }
        changed
    }

    fn mutate_plants(
        &mut self,
        op: impl FnOnce(&mut PlantBook, chrono::DateTime<chrono::Utc>) -> bool,
    ) -> bool {
        let changed = op(&mut self.plants, self.clock.now());
        if changed {
            self.persist_plants();
        }
        changed
    }

    /// Plants without a position, in creation order.
    #[must_use]
    pub fn unplaced_plants(&self) -> Vec<&Plant> {
        self.plants
            .plants()
            .iter()
            .filter(|p| !self.layout.positions().is_placed(&p.id))
            .collect()
    }

    // ── placement ───────────────────────────────────────────────────────────

    /// Record where the canvas currently sits on the page.
    pub fn set_canvas_bounds(&mut self, bounds: Rect) {
        self.engine.set_canvas_bounds(bounds);
    }

    pub fn set_removal_zone(&mut self, zone: Option<Rect>) {
        self.removal_zone = zone;
    }

    /// Hit testing against the current layout, for the input adapters.
    #[must_use]
    pub fn hit_test(&self) -> LayoutHitTest<'_> {
        let hit = LayoutHitTest::new(&self.layout, self.engine.geometry());
        match self.removal_zone {
            Some(zone) => hit.with_removal_zone(zone),
            None => hit,
        }
    }

    /// Place a plant at fractional `(x, y)` inside a bed.
    pub fn place_plant(
        &mut self,
        plant: &PlantId,
        bed: &BedId,
        x: f64,
        y: f64,
    ) -> Option<PlantPosition> {
        if !self.plants.contains(plant) {
            return None;
        }
        let position = self.layout.place_plant(plant.clone(), bed, x, y)?;
        self.persist_positions();
        Some(position)
    }

    pub fn unplace_plant(&mut self, plant: &PlantId) -> Option<PlantPosition> {
        let position = self.layout.unplace_plant(plant)?;
        self.persist_positions();
        Some(position)
    }

    /// Apply a request from any input adapter against the current state.
    pub fn apply_placement(&mut self, request: &PlacementRequest) -> PlacementOutcome {
        if let PlacementSubject::Plant(id) = &request.subject {
            if !self.plants.contains(id) {
                return PlacementOutcome::Ignored {
                    reason: IgnoreReason::UnknownPlant,
                };
            }
        }
        let outcome = self.engine.apply(&mut self.layout, request);
        match &outcome {
            PlacementOutcome::BedMoved { .. } => self.persist_beds(),
            PlacementOutcome::PlantPlaced { .. } | PlacementOutcome::PlantUnplaced { .. } => {
                self.persist_positions();
            }
            PlacementOutcome::Ignored { reason } => {
                tracing::debug!(?reason, subject = ?request.subject, "placement ignored");
            }
        }
        outcome
    }

    #[must_use]
    pub fn capacity(&self) -> Vec<BedCapacity> {
        garden_capacity(&self.layout, &self.plants)
    }

    #[must_use]
    pub fn bed_capacity(&self, id: &BedId) -> Option<BedCapacity> {
        let bed = self.layout.beds().get(id)?;
        Some(bed_capacity(bed, self.layout.positions(), &self.plants))
    }

    // ── inline edits ────────────────────────────────────────────────────────

    /// Apply a finished inline rename. Only commits change anything.
    pub fn apply_edit(&mut self, outcome: EditOutcome<EditKey>) -> bool {
        match outcome {
            EditOutcome::Commit {
                key: EditKey::Plant(id),
                value,
            } => self.rename_plant(&id, &value),
            EditOutcome::Commit {
                key: EditKey::Bed(id),
                value,
            } => self.rename_bed(&id, &value),
            EditOutcome::Rejected { .. } | EditOutcome::Discarded { .. } | EditOutcome::Pending => {
                false
            }
        }
    }

    // ── seasons ─────────────────────────────────────────────────────────────

    /// Make `name` the active season, loading its plants, positions and
    /// ledger. Blank names and the current season are ignored.
    pub fn switch_season(&mut self, name: &str) -> bool {
        let Some(name) = normalize_season(name) else {
            return false;
        };
        if name == self.season {
            return false;
        }
        self.plants = self.repo.load_plants(&name);
        self.layout.replace_positions(self.repo.load_positions(&name));
        let plants = &self.plants;
        self.layout.prune(|id| plants.contains(id));
        self.ledger = self.repo.load_ledger(&name);
        tracing::info!(
            from = %self.season,
            to = %name,
            plants = self.plants.len(),
            "switched season"
        );
        self.season = name;
        self.repo.save_active_season(&self.season);
        true
    }

    /// Archive the active season and start `name` empty.
    ///
    /// The archived season's stored data is left in place, so switching
    /// back to it later restores it. Returns `None` without archiving when
    /// `name` is blank, is the active season, or already has stored data
    /// or a report; use [`switch_season`](Self::switch_season) for those.
    pub fn start_new_season(&mut self, name: &str) -> Option<&SeasonReport> {
        let name = normalize_season(name)?;
        if name == self.season
            || self.reports.iter().any(|r| r.season == name)
            || self.repo.has_season_data(&name)
        {
            tracing::debug!(season = %name, "season already exists");
            return None;
        }
        let report = SeasonReport::archive(&self.season, &self.plants, self.clock.now());
        tracing::info!(
            archived = %report.season,
            next = %name,
            plants = report.plant_count,
            harvest = report.total_harvest,
            "started new season"
        );
        self.reports.push(report);
        self.repo.save_reports(&self.reports);

        self.season = name;
        self.plants = PlantBook::default();
        self.layout.replace_positions(PositionStore::new());
        self.ledger = Ledger::default();
        self.persist_plants();
        self.persist_positions();
        self.persist_ledger();
        self.repo.save_active_season(&self.season);
        self.reports.last()
    }

    // ── economics ───────────────────────────────────────────────────────────

    pub fn set_economics_settings(&mut self, settings: EconomicsSettings) {
        self.settings = settings;
        self.repo.save_settings(&self.settings);
    }

    pub fn set_produce_price(&mut self, plant_type: &str, price: f64) -> bool {
        let set = self.prices.set(plant_type, price);
        if set {
            self.repo.save_prices(&self.prices);
        }
        set
    }

    pub fn remove_produce_price(&mut self, plant_type: &str) -> Option<f64> {
        let price = self.prices.remove(plant_type)?;
        self.repo.save_prices(&self.prices);
        Some(price)
    }

    pub fn add_expense(
        &mut self,
        description: &str,
        category: ExpenseCategory,
        amount: f64,
    ) -> Option<String> {
        let id = self
            .ledger
            .add_expense(description, category, amount, self.clock.now())?;
        self.repo.save_expenses(&self.season, &self.ledger);
        Some(id)
    }

    pub fn remove_expense(&mut self, id: &str) -> bool {
        let removed = self.ledger.remove_expense(id).is_some();
        if removed {
            self.repo.save_expenses(&self.season, &self.ledger);
        }
        removed
    }

    pub fn log_time(&mut self, activity: &str, minutes: u32) -> Option<String> {
        let id = self.ledger.log_time(activity, minutes, self.clock.now())?;
        self.repo.save_time_entries(&self.season, &self.ledger);
        Some(id)
    }

    pub fn remove_time_entry(&mut self, id: &str) -> bool {
        let removed = self.ledger.remove_time_entry(id).is_some();
        if removed {
            self.repo.save_time_entries(&self.season, &self.ledger);
        }
        removed
    }

    #[must_use]
    pub fn economics(&self) -> EconomicsSummary {
        EconomicsSummary::compute(&self.ledger, &self.plants, &self.prices, &self.settings)
    }

    #[must_use]
    pub fn stats(&self) -> GardenStats {
        GardenStats::compute(&self.plants, &self.layout)
    }
}

impl std::fmt::Debug for Garden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Garden")
            .field("season", &self.season)
            .field("backend", &self.repo.store().backend_name())
            .field("beds", &self.layout.beds().len())
            .field("plants", &self.plants.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use gardenkit_core::clock::ManualClock;
    use gardenkit_core::geometry::Point;
    use gardenkit_layout::PlacementTarget;
    use pretty_assertions::assert_eq;

    fn garden() -> (Garden, ManualClock, Arc<MemoryStorage>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        let backend = Arc::new(MemoryStorage::new());
        let garden = Garden::open_with_clock(
            backend.clone(),
            GardenConfig::default(),
            Arc::new(clock.clone()),
        );
        (garden, clock, backend)
    }

    #[test]
    fn first_run_has_example_beds_and_default_season() {
        let (garden, _, _) = garden();
        assert_eq!(garden.season(), "default");
        let names: Vec<_> = garden.layout().beds().beds().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Vegetable Bed", "Herb Planter"]);
        assert_eq!(*garden.layout().boundary(), GardenBoundary::default());
    }

    #[test]
    fn removing_plant_cascades_and_persists() {
        let (mut garden, _, backend) = garden();
        let id = garden.add_plant(PlantDraft::new("Tomato", "Tomato")).unwrap();
        garden.place_plant(&id, &BedId::new("bed-1"), 0.5, 0.5).unwrap();
        assert!(backend.get("garden:positions:default").unwrap().unwrap().contains("plant-1"));

        garden.remove_plant(&id).unwrap();
        assert!(garden.layout().positions().is_empty());
        assert_eq!(backend.get("garden:positions:default").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn placement_of_unknown_plant_is_ignored() {
        let (mut garden, _, _) = garden();
        let outcome = garden.apply_placement(&PlacementRequest {
            subject: PlacementSubject::Plant(PlantId::new("ghost")),
            target: PlacementTarget::Bed {
                id: BedId::new("bed-1"),
                rect: Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
            },
            pointer: Point::new(10.0, 10.0),
        });
        assert_eq!(
            outcome,
            PlacementOutcome::Ignored {
                reason: IgnoreReason::UnknownPlant
            }
        );
    }

    #[test]
    fn statuses_refresh_from_clock() {
        let (mut garden, clock, _) = garden();
        let id = garden.add_plant(PlantDraft::new("Basil", "Herb")).unwrap();
        clock.advance(Duration::days(8));
        assert_eq!(garden.refresh_statuses(), 1);
        assert_eq!(garden.plant(&id).unwrap().status, crate::PlantStatus::Critical);
        assert!(garden.water_plant(&id));
        assert_eq!(garden.plant(&id).unwrap().status, crate::PlantStatus::Healthy);
    }

    #[test]
    fn inline_edit_commit_renames_bed() {
        let (mut garden, _, _) = garden();
        let bed = BedId::new("bed-1");
        assert!(garden.apply_edit(EditOutcome::Commit {
            key: EditKey::Bed(bed.clone()),
            value: "Tomatoes".into(),
        }));
        assert!(!garden.apply_edit(EditOutcome::Rejected {
            key: EditKey::Bed(bed.clone())
        }));
        assert_eq!(garden.bed(&bed).unwrap().name, "Tomatoes");
    }

    #[test]
    fn boundary_inputs_commit_clamped() {
        let (mut garden, _, backend) = garden();
        let (mut w, mut h) = garden.boundary_inputs();
        w.edit("75");
        h.edit("oops");
        let boundary = garden.commit_boundary_inputs(&mut w, &mut h);
        assert_eq!((boundary.width, boundary.height), (50, 8));
        assert!(backend.get("garden:boundary").unwrap().unwrap().contains("50"));
    }
}
