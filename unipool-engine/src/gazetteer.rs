//! Static gazetteer of named locations.
//!
//! The external geocoder is rate-limited and occasionally unavailable, so
//! the gateway falls back to this small table of well-known locations.
//! Lookup is a case-insensitive substring match on name or address.

use crate::domain::Point;

/// A named location with known coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLocation {
    /// Display name, e.g. "Model Town".
    pub name: String,

    /// Full address, e.g. "Model Town, Lahore, Pakistan".
    pub address: String,

    pub point: Point,

    /// Coarse category: "university", "residential", "commercial",
    /// "transport".
    pub kind: String,
}

/// A collection of named locations searchable by substring.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<NamedLocation>,
}

impl Gazetteer {
    /// Create an empty gazetteer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All locations whose name or address contains the query,
    /// case-insensitively. The query is trimmed first.
    pub fn search(&self, query: &str) -> Vec<&NamedLocation> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&needle)
                    || entry.address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The first location matching the query, if any.
    pub fn find(&self, query: &str) -> Option<&NamedLocation> {
        self.search(query).into_iter().next()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the gazetteer has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for assembling a gazetteer.
#[derive(Debug, Default)]
pub struct GazetteerBuilder {
    inner: Gazetteer,
}

impl GazetteerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named location. Entries with out-of-range coordinates are
    /// silently skipped.
    pub fn add(mut self, name: &str, address: &str, kind: &str, lat: f64, lng: f64) -> Self {
        if let Ok(point) = Point::new(lat, lng) {
            self.inner.entries.push(NamedLocation {
                name: name.to_string(),
                address: address.to_string(),
                point,
                kind: kind.to_string(),
            });
        }
        self
    }

    /// Build the gazetteer.
    pub fn build(self) -> Gazetteer {
        self.inner
    }
}

/// The default set of well-known Lahore locations.
pub fn lahore_gazetteer() -> Gazetteer {
    GazetteerBuilder::new()
        .add(
            "FCC University",
            "FCC University, Lahore, Pakistan",
            "university",
            31.522381,
            74.331627,
        )
        .add(
            "Model Town",
            "Model Town, Lahore, Pakistan",
            "residential",
            31.4662,
            74.3436,
        )
        .add(
            "DHA Phase 1",
            "DHA Phase 1, Lahore, Pakistan",
            "residential",
            31.4831,
            74.3902,
        )
        .add(
            "DHA Phase 2",
            "DHA Phase 2, Lahore, Pakistan",
            "residential",
            31.4800,
            74.3850,
        )
        .add(
            "DHA Phase 3",
            "DHA Phase 3, Lahore, Pakistan",
            "residential",
            31.4770,
            74.3800,
        )
        .add(
            "DHA Phase 4",
            "DHA Phase 4, Lahore, Pakistan",
            "residential",
            31.4740,
            74.3750,
        )
        .add(
            "DHA Phase 5",
            "DHA Phase 5, Lahore, Pakistan",
            "residential",
            31.4710,
            74.3700,
        )
        .add(
            "Gulberg III",
            "Gulberg III, Lahore, Pakistan",
            "residential",
            31.5200,
            74.3600,
        )
        .add(
            "Gulberg IV",
            "Gulberg IV, Lahore, Pakistan",
            "residential",
            31.5170,
            74.3550,
        )
        .add(
            "Jail Road",
            "Jail Road, Lahore, Pakistan",
            "commercial",
            31.5300,
            74.3400,
        )
        .add(
            "Mall Road",
            "Mall Road, Lahore, Pakistan",
            "commercial",
            31.5400,
            74.3500,
        )
        .add(
            "Allama Iqbal International Airport",
            "Allama Iqbal International Airport, Lahore, Pakistan",
            "transport",
            31.5216,
            74.4036,
        )
        .add(
            "Lahore Railway Station",
            "Lahore Railway Station, Lahore, Pakistan",
            "transport",
            31.5820,
            74.2647,
        )
        .build()
}
