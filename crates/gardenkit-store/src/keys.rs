#![forbid(unsafe_code)]

//! Storage key naming.
//!
//! Global collections live under `{namespace}:{collection}`; per-season
//! collections append the season name: `{namespace}:{collection}:{season}`.

/// Builds the string keys for every persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    namespace: String,
}

impl KeyScheme {
    /// Create a scheme under `namespace`. A blank namespace falls back to
    /// `garden`.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let trimmed = namespace.trim();
        Self {
            namespace: if trimmed.is_empty() {
                "garden".to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn global(&self, collection: &str) -> String {
        format!("{}:{collection}", self.namespace)
    }

    fn seasonal(&self, collection: &str, season: &str) -> String {
        format!("{}:{collection}:{}", self.namespace, season.trim())
    }

    #[must_use]
    pub fn beds(&self) -> String {
        self.global("beds")
    }

    #[must_use]
    pub fn boundary(&self) -> String {
        self.global("boundary")
    }

    #[must_use]
    pub fn season_reports(&self) -> String {
        self.global("season-reports")
    }

    #[must_use]
    pub fn active_season(&self) -> String {
        self.global("active-season")
    }

    #[must_use]
    pub fn economics_settings(&self) -> String {
        self.global("economics-settings")
    }

    #[must_use]
    pub fn produce_prices(&self) -> String {
        self.global("produce-prices")
    }

    #[must_use]
    pub fn positions(&self, season: &str) -> String {
        self.seasonal("positions", season)
    }

    #[must_use]
    pub fn plants(&self, season: &str) -> String {
        self.seasonal("plants", season)
    }

    #[must_use]
    pub fn expenses(&self, season: &str) -> String {
        self.seasonal("expenses", season)
    }

    #[must_use]
    pub fn time_entries(&self, season: &str) -> String {
        self.seasonal("time-entries", season)
    }
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new("garden")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_and_seasonal_keys() {
        let keys = KeyScheme::default();
        assert_eq!(keys.beds(), "garden:beds");
        assert_eq!(keys.active_season(), "garden:active-season");
        assert_eq!(keys.positions("Spring 2024"), "garden:positions:Spring 2024");
        assert_eq!(keys.plants(" fall "), "garden:plants:fall");
    }

    #[test]
    fn blank_namespace_uses_default() {
        assert_eq!(KeyScheme::new("  ").namespace(), "garden");
        assert_eq!(KeyScheme::new("allotment").boundary(), "allotment:boundary");
    }
}
