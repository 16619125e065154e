//! Shared tariff data model used by the scraper engine, the HTTP server and the CLI.

use serde::{Deserialize, Serialize};

/// A place as known to the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    pub label: String,
}

impl Location {
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Which side of a shipment a lookup query describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Origin,
    Destination,
}

impl LocationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Origin => "origin",
            LocationKind::Destination => "destination",
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate (origin, destination) pair awaiting a fee fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub origin: Location,
    pub destination: Location,
}

/// One row of the carrier's fee table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffEntry {
    pub service_name: String,
    pub shipment_type: String,
    pub fee: String,
    pub etd: String,
}

/// A fully resolved fee lookup for one combination.
///
/// Codes come from the location resolver; labels come from the quote page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
    pub origin: Location,
    pub destination: Location,
    pub weight: u32,
    pub tariff: Vec<TariffEntry>,
}

/// Window of the combination set that was dispatched.
///
/// Always derived from the un-paginated total, never from the number of
/// entries that survived fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffInfo {
    pub origin: Location,
    pub destination: Location,
    pub weight: u32,
}

/// Result of the single-pair lookup path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffQuote {
    pub info: TariffInfo,
    pub tariff: Vec<TariffEntry>,
}
