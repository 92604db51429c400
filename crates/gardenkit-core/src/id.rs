#![forbid(unsafe_code)]

//! Stable string identifiers for plants and beds.
//!
//! Identifiers are opaque strings on the wire (stored data may carry ids
//! produced by older versions), but freshly allocated ids always take the
//! form `{prefix}-{n}` with a monotonically increasing `n`.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Identifier of a plant within a season.
    PlantId
);

string_id!(
    /// Identifier of a garden bed (beds are shared across seasons).
    BedId
);

/// Monotonic allocator for prefixed string ids.
///
/// The allocator never hands out an id for which `taken` returns `true`, so
/// it stays collision-free even when seeded from stored data that contains
/// foreign id formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: &'static str,
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first candidate is `{prefix}-1`.
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Prefix used for allocated ids.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Record an existing id so later allocations start past it.
    pub fn observe(&mut self, existing: &str) {
        let Some(suffix) = existing
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return;
        };
        if let Ok(n) = suffix.parse::<u64>() {
            self.next = self.next.max(n.saturating_add(1));
        }
    }

    /// Allocate the next id not rejected by `taken`.
    pub fn allocate(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{}-{}", self.prefix, self.next);
            self.next = self.next.saturating_add(1);
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = PlantId::new("plant-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"plant-7\"");
        let back: BedId = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(back.as_str(), "1700000000000");
    }

    #[test]
    fn allocator_counts_up() {
        let mut ids = IdAllocator::new("bed");
        assert_eq!(ids.allocate(|_| false), "bed-1");
        assert_eq!(ids.allocate(|_| false), "bed-2");
    }

    #[test]
    fn allocator_skips_observed_ids() {
        let mut ids = IdAllocator::new("plant");
        ids.observe("plant-41");
        ids.observe("plant-3");
        ids.observe("bed-99");
        ids.observe("plant-abc");
        assert_eq!(ids.allocate(|_| false), "plant-42");
    }

    #[test]
    fn allocator_skips_taken_candidates() {
        let mut ids = IdAllocator::new("bed");
        let taken = ["bed-1", "bed-2"];
        assert_eq!(ids.allocate(|c| taken.contains(&c)), "bed-3");
    }
}
