//! Travel-pattern analysis over booking history.

use chrono::Timelike;

use crate::domain::BookingRecord;

/// Insertion-ordered frequency counter.
///
/// Keys keep the order they were first seen, so ranking is deterministic
/// when counts tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyMap<K> {
    entries: Vec<(K, u32)>,
}

impl<K> Default for FrequencyMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> FrequencyMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: K) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 += 1;
        } else {
            self.entries.push((key, 1));
        }
    }

    /// The `n` most frequent keys; ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<&K> {
        let mut ranked: Vec<&(K, u32)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(k, _)| k).collect()
    }

    pub fn count(&self, key: &K) -> u32 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Keys with their counts, in first-seen order.
    pub fn entries(&self) -> &[(K, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Frequency maps over one user's booking history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelPatterns {
    /// Pickup locations.
    pub pickups: FrequencyMap<String>,
    /// Destinations.
    pub destinations: FrequencyMap<String>,
    /// Departure hour of day (0..=23).
    pub hours: FrequencyMap<u32>,
    /// Full routes as `"pickup → destination"` strings.
    pub routes: FrequencyMap<String>,
}

/// Tally pickups, destinations, departure hours, and full routes.
pub fn analyze_patterns(history: &[BookingRecord]) -> TravelPatterns {
    let mut patterns = TravelPatterns::default();
    for record in history {
        patterns.pickups.record(record.pickup.clone());
        patterns.destinations.record(record.destination.clone());
        patterns.hours.record(record.departure.hour());
        patterns
            .routes
            .record(format!("{} → {}", record.pickup, record.destination));
    }
    patterns
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn record(pickup: &str, destination: &str, departure: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            pickup: pickup.to_string(),
            destination: destination.to_string(),
            departure,
        }
    }

    fn morning(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn record_counts_repeat_keys() {
        let mut map = FrequencyMap::new();
        map.record("Model Town");
        map.record("Gulberg");
        map.record("Model Town");

        assert_eq!(map.count(&"Model Town"), 2);
        assert_eq!(map.count(&"Gulberg"), 1);
        assert_eq!(map.count(&"DHA"), 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn top_ranks_by_count_then_first_seen() {
        let mut map = FrequencyMap::new();
        map.record("b");
        map.record("a");
        map.record("a");
        map.record("c");

        assert_eq!(map.top(2), vec![&"a", &"b"]);
        // "b" and "c" tie on count; "b" was seen first.
        assert_eq!(map.top(3), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn top_handles_short_maps() {
        let mut map = FrequencyMap::new();
        map.record(8u32);

        assert_eq!(map.top(3), vec![&8]);
        assert!(FrequencyMap::<u32>::new().top(3).is_empty());
    }

    #[test]
    fn analyze_tallies_all_four_dimensions() {
        let history = vec![
            record("Model Town", "FCC University", morning(8, 30)),
            record("Model Town", "FCC University", morning(9, 15)),
            record("Gulberg", "Mall Road", morning(8, 45)),
        ];

        let patterns = analyze_patterns(&history);

        assert_eq!(
            patterns.pickups.entries().to_vec(),
            vec![("Model Town".to_string(), 2), ("Gulberg".to_string(), 1)]
        );
        assert_eq!(
            patterns.destinations.entries().to_vec(),
            vec![
                ("FCC University".to_string(), 2),
                ("Mall Road".to_string(), 1)
            ]
        );
        assert_eq!(patterns.hours.entries().to_vec(), vec![(8, 2), (9, 1)]);
        assert_eq!(
            patterns.routes.entries().to_vec(),
            vec![
                ("Model Town → FCC University".to_string(), 2),
                ("Gulberg → Mall Road".to_string(), 1)
            ]
        );
    }

    #[test]
    fn empty_history_yields_empty_patterns() {
        let patterns = analyze_patterns(&[]);

        assert!(patterns.pickups.is_empty());
        assert!(patterns.destinations.is_empty());
        assert!(patterns.hours.is_empty());
        assert!(patterns.routes.is_empty());
    }
}
