//! Ride matching.
//!
//! Candidates from the ride store are scored against a rider request on five
//! weighted criteria (destination, departure time, pickup distance, driver
//! rating, route detour), ranked, capped, and enriched with driver and
//! seat-availability details. Scoring is pure; the engine supplies it with
//! resolved values from the gateway and the stores.

mod config;
mod engine;
mod score;

#[cfg(test)]
mod engine_tests;

pub use config::{MatchConfig, ScoreWeights};
pub use engine::{MatchEngine, MatchError, MatchReport, RideMatch};
pub use score::{Convenience, CriterionScores, MatchQuality, MatchScore, PickupSuggestion};
