#![forbid(unsafe_code)]

//! Typed persistence for every garden collection.
//!
//! Loads never fail: anything missing or malformed comes back as its
//! default. Saves are fire-and-forget and return `false` when the backend
//! rejected the write.

use gardenkit_layout::{BedRegistry, GardenBed, GardenBoundary, PlantPosition, PositionStore};
use gardenkit_store::{KeyScheme, StorageBackend, StorageKey, TypedStore};

use crate::economics::{EconomicsSettings, Expense, Ledger, ProducePrices, TimeEntry};
use crate::plant::{Plant, PlantBook};
use crate::season::SeasonReport;

#[derive(Debug, Clone)]
pub struct GardenRepository {
    store: TypedStore,
    keys: KeyScheme,
}

impl GardenRepository {
    #[must_use]
    pub fn new(store: TypedStore, keys: KeyScheme) -> Self {
        Self { store, keys }
    }

    #[must_use]
    pub fn store(&self) -> &TypedStore {
        &self.store
    }

    #[must_use]
    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    fn beds_key(&self) -> StorageKey<Vec<GardenBed>> {
        StorageKey::new(self.keys.beds())
    }

    fn boundary_key(&self) -> StorageKey<GardenBoundary> {
        StorageKey::new(self.keys.boundary())
    }

    fn positions_key(&self, season: &str) -> StorageKey<Vec<PlantPosition>> {
        StorageKey::new(self.keys.positions(season))
    }

    fn plants_key(&self, season: &str) -> StorageKey<Vec<Plant>> {
        StorageKey::new(self.keys.plants(season))
    }

    fn reports_key(&self) -> StorageKey<Vec<SeasonReport>> {
        StorageKey::new(self.keys.season_reports())
    }

    fn active_season_key(&self) -> StorageKey<String> {
        StorageKey::new(self.keys.active_season())
    }

    fn settings_key(&self) -> StorageKey<EconomicsSettings> {
        StorageKey::new(self.keys.economics_settings())
    }

    fn prices_key(&self) -> StorageKey<ProducePrices> {
        StorageKey::new(self.keys.produce_prices())
    }

    fn expenses_key(&self, season: &str) -> StorageKey<Vec<Expense>> {
        StorageKey::new(self.keys.expenses(season))
    }

    fn time_entries_key(&self, season: &str) -> StorageKey<Vec<TimeEntry>> {
        StorageKey::new(self.keys.time_entries(season))
    }

    /// Whether any per-season key of `season` holds a value.
    #[must_use]
    pub fn has_season_data(&self, season: &str) -> bool {
        let backend = self.store.backend();
        [
            self.keys.plants(season),
            self.keys.positions(season),
            self.keys.expenses(season),
            self.keys.time_entries(season),
        ]
        .iter()
        .any(|key| matches!(backend.get(key), Ok(Some(_))))
    }

    /// Stored beds; the two example beds when nothing (or garbage) is
    /// stored. A stored empty list stays empty.
    #[must_use]
    pub fn load_beds(&self) -> BedRegistry {
        let key: StorageKey<Option<Vec<GardenBed>>> = StorageKey::new(self.keys.beds());
        match self.store.load_or(&key, || None) {
            Some(beds) => BedRegistry::from_beds(beds),
            None => BedRegistry::with_example_beds(),
        }
    }

    pub fn save_beds(&self, beds: &BedRegistry) -> bool {
        self.store.persist(&self.beds_key(), &beds.beds().to_vec())
    }

    #[must_use]
    pub fn load_boundary(&self, default: GardenBoundary) -> GardenBoundary {
        let stored = self.store.load_or(&self.boundary_key(), || default);
        GardenBoundary {
            show_boundary: stored.show_boundary,
            ..GardenBoundary::new(stored.width, stored.height)
        }
    }

    pub fn save_boundary(&self, boundary: &GardenBoundary) -> bool {
        self.store.persist(&self.boundary_key(), boundary)
    }

    #[must_use]
    pub fn load_positions(&self, season: &str) -> PositionStore {
        PositionStore::from_positions(self.store.load_or(&self.positions_key(season), Vec::new))
    }

    pub fn save_positions(&self, season: &str, positions: &PositionStore) -> bool {
        self.store
            .persist(&self.positions_key(season), &positions.positions().to_vec())
    }

    #[must_use]
    pub fn load_plants(&self, season: &str) -> PlantBook {
        PlantBook::from_plants(self.store.load_or(&self.plants_key(season), Vec::new))
    }

    pub fn save_plants(&self, season: &str, plants: &PlantBook) -> bool {
        self.store
            .persist(&self.plants_key(season), &plants.plants().to_vec())
    }

    #[must_use]
    pub fn load_reports(&self) -> Vec<SeasonReport> {
        self.store.load_or(&self.reports_key(), Vec::new)
    }

    pub fn save_reports(&self, reports: &[SeasonReport]) -> bool {
        self.store.persist(&self.reports_key(), &reports.to_vec())
    }

    /// Stored active season, or `fallback` when missing or blank.
    #[must_use]
    pub fn load_active_season(&self, fallback: &str) -> String {
        let stored = self
            .store
            .load_or(&self.active_season_key(), || fallback.to_string());
        crate::season::normalize_season(&stored).unwrap_or_else(|| fallback.to_string())
    }

    pub fn save_active_season(&self, season: &str) -> bool {
        self.store
            .persist(&self.active_season_key(), &season.to_string())
    }

    #[must_use]
    pub fn load_settings(&self) -> EconomicsSettings {
        self.store
            .load_or(&self.settings_key(), EconomicsSettings::default)
    }

    pub fn save_settings(&self, settings: &EconomicsSettings) -> bool {
        self.store.persist(&self.settings_key(), settings)
    }

    #[must_use]
    pub fn load_prices(&self) -> ProducePrices {
        self.store.load_or(&self.prices_key(), ProducePrices::default)
    }

    pub fn save_prices(&self, prices: &ProducePrices) -> bool {
        self.store.persist(&self.prices_key(), prices)
    }

    #[must_use]
    pub fn load_ledger(&self, season: &str) -> Ledger {
        Ledger::from_parts(
            self.store.load_or(&self.expenses_key(season), Vec::new),
            self.store.load_or(&self.time_entries_key(season), Vec::new),
        )
    }

    pub fn save_expenses(&self, season: &str, ledger: &Ledger) -> bool {
        self.store
            .persist(&self.expenses_key(season), &ledger.expenses().to_vec())
    }

    pub fn save_time_entries(&self, season: &str, ledger: &Ledger) -> bool {
        self.store
            .persist(&self.time_entries_key(season), &ledger.time_entries().to_vec())
    }
}
