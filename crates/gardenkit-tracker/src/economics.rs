#![forbid(unsafe_code)]

//! Costs, time, and the value of what the garden produced.
//!
//! Amounts are stored in the user's currency and weights in the user's unit
//! system exactly as entered; nothing here converts between them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gardenkit_core::id::IdAllocator;
use serde::{Deserialize, Serialize};

use crate::plant::PlantBook;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Label for harvest weights.
    #[must_use]
    pub const fn weight_unit(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EconomicsSettings {
    /// ISO 4217 code, e.g. `USD`.
    pub currency: String,
    pub unit_system: UnitSystem,
}

impl Default for EconomicsSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            unit_system: UnitSystem::Metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Seeds,
    Soil,
    Fertilizer,
    Tools,
    Water,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: String,
    pub activity: String,
    pub minutes: u32,
    pub date: DateTime<Utc>,
}

/// Price per weight unit, keyed by normalized plant type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducePrices(BTreeMap<String, f64>);

fn price_key(plant_type: &str) -> String {
    plant_type.trim().to_lowercase()
}

impl ProducePrices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price for a plant type. Blank types and negative or
    /// non-finite prices are rejected.
    pub fn set(&mut self, plant_type: &str, price: f64) -> bool {
        let key = price_key(plant_type);
        if key.is_empty() || !(price.is_finite() && price >= 0.0) {
            return false;
        }
        self.0.insert(key, price);
        true
    }

    pub fn remove(&mut self, plant_type: &str) -> Option<f64> {
        self.0.remove(&price_key(plant_type))
    }

    /// Price for a plant type, case-insensitive.
    #[must_use]
    pub fn get(&self, plant_type: &str) -> Option<f64> {
        self.0.get(&price_key(plant_type)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Expenses and time entries of one season.
#[derive(Debug, Clone)]
pub struct Ledger {
    expenses: Vec<Expense>,
    time_entries: Vec<TimeEntry>,
    expense_ids: IdAllocator,
    time_ids: IdAllocator,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.expenses == other.expenses && self.time_entries == other.time_entries
    }
}

impl Ledger {
    /// Adopt stored entries. Amounts that are not finite and non-negative
    /// are dropped.
    #[must_use]
    pub fn from_parts(expenses: Vec<Expense>, time_entries: Vec<TimeEntry>) -> Self {
        let mut expense_ids = IdAllocator::new("expense");
        let mut time_ids = IdAllocator::new("time");
        let expenses: Vec<Expense> = expenses
            .into_iter()
            .filter(|e| e.amount.is_finite() && e.amount >= 0.0)
            .collect();
        for e in &expenses {
            expense_ids.observe(&e.id);
        }
        for t in &time_entries {
            time_ids.observe(&t.id);
        }
        Self {
            expenses,
            time_entries,
            expense_ids,
            time_ids,
        }
    }

    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    #[must_use]
    pub fn time_entries(&self) -> &[TimeEntry] {
        &self.time_entries
    }

    pub fn add_expense(
        &mut self,
        description: &str,
        category: ExpenseCategory,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Option<String> {
        let description = description.trim();
        if description.is_empty() || !(amount.is_finite() && amount >= 0.0) {
            return None;
        }
        let expenses = &self.expenses;
        let id = self.expense_ids.allocate(|c| expenses.iter().any(|e| e.id == c));
        self.expenses.push(Expense {
            id: id.clone(),
            description: description.to_string(),
            category,
            amount,
            date,
        });
        Some(id)
    }

    pub fn remove_expense(&mut self, id: &str) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// Log time spent. Zero minutes and blank activities are rejected.
    pub fn log_time(
        &mut self,
        activity: &str,
        minutes: u32,
        date: DateTime<Utc>,
    ) -> Option<String> {
        let activity = activity.trim();
        if activity.is_empty() || minutes == 0 {
            return None;
        }
        let entries = &self.time_entries;
        let id = self.time_ids.allocate(|c| entries.iter().any(|t| t.id == c));
        self.time_entries.push(TimeEntry {
            id: id.clone(),
            activity: activity.to_string(),
            minutes,
            date,
        });
        Some(id)
    }

    pub fn remove_time_entry(&mut self, id: &str) -> Option<TimeEntry> {
        let index = self.time_entries.iter().position(|t| t.id == id)?;
        Some(self.time_entries.remove(index))
    }

    #[must_use]
    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.time_entries.iter().map(|t| f64::from(t.minutes)).sum::<f64>() / 60.0
    }

    /// Expense totals per category.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<ExpenseCategory, f64> {
        let mut totals = BTreeMap::new();
        for e in &self.expenses {
            *totals.entry(e.category).or_insert(0.0) += e.amount;
        }
        totals
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Expense>, Vec<TimeEntry>) {
        (self.expenses, self.time_entries)
    }
}

/// Season economics at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicsSummary {
    pub currency: String,
    pub weight_unit: String,
    pub total_expenses: f64,
    pub total_hours: f64,
    pub total_harvest: f64,
    pub harvest_value: f64,
    /// `harvest_value - total_expenses`.
    pub net: f64,
    /// `None` when no time was logged.
    pub value_per_hour: Option<f64>,
    /// `None` when nothing was harvested.
    pub cost_per_weight_unit: Option<f64>,
}

impl EconomicsSummary {
    /// Plants whose type has no price contribute nothing to the value.
    #[must_use]
    pub fn compute(
        ledger: &Ledger,
        plants: &PlantBook,
        prices: &ProducePrices,
        settings: &EconomicsSettings,
    ) -> Self {
        let total_expenses = ledger.total_expenses();
        let total_hours = ledger.total_hours();
        let total_harvest = plants.total_harvest();
        let harvest_value: f64 = plants
            .plants()
            .iter()
            .map(|p| p.harvest_total * prices.get(&p.plant_type).unwrap_or(0.0))
            .sum();
        Self {
            currency: settings.currency.clone(),
            weight_unit: settings.unit_system.weight_unit().to_string(),
            total_expenses,
            total_hours,
            total_harvest,
            harvest_value,
            net: harvest_value - total_expenses,
            value_per_hour: (total_hours > 0.0).then(|| harvest_value / total_hours),
            cost_per_weight_unit: (total_harvest > 0.0).then(|| total_expenses / total_harvest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::PlantDraft;
    use chrono::TimeZone;

    fn day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn ledger_validates_entries() {
        let mut ledger = Ledger::default();
        assert!(ledger.add_expense("", ExpenseCategory::Seeds, 3.0, day()).is_none());
        assert!(ledger.add_expense("Seeds", ExpenseCategory::Seeds, -3.0, day()).is_none());
        let id = ledger.add_expense("Seeds", ExpenseCategory::Seeds, 3.0, day()).unwrap();
        assert_eq!(id, "expense-1");
        assert!(ledger.log_time("Weeding", 0, day()).is_none());
        ledger.log_time("Weeding", 90, day()).unwrap();
        assert_eq!(ledger.total_hours(), 1.5);
        assert!(ledger.remove_expense(&id).is_some());
        assert_eq!(ledger.total_expenses(), 0.0);
    }

    #[test]
    fn summary_values_harvest_by_type() {
        let mut plants = PlantBook::default();
        let tomato = plants.add(PlantDraft::new("Tomato", "Tomato"), day()).unwrap();
        let kale = plants.add(PlantDraft::new("Kale", "Kale"), day()).unwrap();
        plants.harvest(&tomato, 4.0);
        plants.harvest(&kale, 1.0);

        let mut prices = ProducePrices::new();
        assert!(prices.set(" tomato ", 2.5));
        assert!(!prices.set("kale", f64::NAN));

        let mut ledger = Ledger::default();
        ledger.add_expense("Soil", ExpenseCategory::Soil, 6.0, day());
        ledger.log_time("Planting", 120, day());

        let summary =
            EconomicsSummary::compute(&ledger, &plants, &prices, &EconomicsSettings::default());
        assert_eq!(summary.harvest_value, 10.0);
        assert_eq!(summary.net, 4.0);
        assert_eq!(summary.value_per_hour, Some(5.0));
        assert_eq!(summary.cost_per_weight_unit, Some(1.2));
        assert_eq!(summary.weight_unit, "kg");
    }

    #[test]
    fn empty_ledger_has_no_rates() {
        let summary = EconomicsSummary::compute(
            &Ledger::default(),
            &PlantBook::default(),
            &ProducePrices::new(),
            &EconomicsSettings {
                currency: "EUR".into(),
                unit_system: UnitSystem::Imperial,
            },
        );
        assert_eq!(summary.value_per_hour, None);
        assert_eq!(summary.cost_per_weight_unit, None);
        assert_eq!(summary.weight_unit, "lb");
    }
}
