//! Tuning knobs for ride matching.

use chrono::Duration;

/// Relative weight of each scoring criterion. The defaults sum to 1.0 so the
/// weighted total stays in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub university: f64,
    pub time: f64,
    pub location: f64,
    pub rating: f64,
    pub route: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            university: 0.30,
            time: 0.25,
            location: 0.20,
            rating: 0.15,
            route: 0.10,
        }
    }
}

/// Configuration for the match engine.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Criterion weights.
    pub weights: ScoreWeights,
    /// Candidates departing further than this from the requested time score
    /// zero on the time criterion.
    pub time_window_mins: i64,
    /// Pickups further away than this score zero on the location criterion.
    pub max_pickup_distance_meters: f64,
    /// Drivers rated below this score zero on the rating criterion.
    pub min_driver_rating: f64,
    /// Maximum matches returned per request.
    pub max_results: usize,
    /// Route points further than this from the rider are not suggested as
    /// pickup spots.
    pub suggestion_radius_meters: f64,
}

impl MatchConfig {
    /// The departure window as a duration.
    pub fn time_window(&self) -> Duration {
        Duration::minutes(self.time_window_mins)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            time_window_mins: 30,
            max_pickup_distance_meters: 5000.0,
            min_driver_rating: 4.0,
            max_results: 20,
            suggestion_radius_meters: 2000.0,
        }
    }
}
