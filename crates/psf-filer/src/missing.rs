//! Accumulator for optional content absent from a file.

use serde::Serialize;

/// Document locations of optional items that were not present.
///
/// Entries are only ever added, so once [`is_any`](Self::is_any) reports
/// true it stays true for the rest of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingContent {
    locations: Vec<String>,
}

impl MissingContent {
    /// Record a location; a location already recorded is kept once.
    pub fn record(&mut self, location: impl Into<String>) {
        let location = location.into();
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
    }

    /// Append everything recorded in `other`.
    pub fn merge(&mut self, other: MissingContent) {
        for location in other.locations {
            self.record(location);
        }
    }

    /// Aggregate flag: true if anything optional was missing.
    #[must_use]
    pub fn is_any(&self) -> bool {
        !self.locations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }
}
