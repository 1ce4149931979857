//! Pure scoring functions for ride candidates.
//!
//! Every criterion lands in [0, 1]; the weighted total is rounded to two
//! decimals. Nothing here performs I/O: the engine resolves the rider pickup
//! and fetches drivers up front and passes plain values in.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Point, User};
use crate::geo::distance_meters;

use super::config::ScoreWeights;

/// Institutions recognized by the destination matcher. Deliberately tiny:
/// the service runs for one campus, and broadening the list changes match
/// semantics, so additions go through this constant.
const KNOWN_INSTITUTIONS: [&str; 3] = ["FCC", "FCCU", "Forman Christian College"];

/// Score used for distance criteria when the rider pickup never resolved.
const NEUTRAL_SCORE: f64 = 0.5;

/// Pickups at most this far from the rider score full marks on location.
const FULL_SCORE_PICKUP_METERS: f64 = 1000.0;

/// Detour thresholds for the route-efficiency criterion.
const ON_ROUTE_METERS: f64 = 500.0;
const NEAR_ROUTE_METERS: f64 = 2000.0;

/// Convenience tier boundaries for pickup suggestions.
const HIGH_CONVENIENCE_METERS: f64 = 500.0;
const MEDIUM_CONVENIENCE_METERS: f64 = 1000.0;

/// Per-criterion component scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionScores {
    pub university_match: f64,
    pub time_match: f64,
    pub location_match: f64,
    pub rating_score: f64,
    pub route_efficiency: f64,
}

/// Component scores plus the weighted, 2-decimal-rounded total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub criteria: CriterionScores,
    pub total: f64,
}

/// Coarse label derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchQuality {
    pub fn from_total(total: f64) -> Self {
        if total >= 0.8 {
            Self::Excellent
        } else if total >= 0.6 {
            Self::Good
        } else if total >= 0.4 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// How handy a suggested pickup spot is for the rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convenience {
    High,
    Medium,
    Low,
}

/// A point on a candidate route the rider could walk to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSuggestion {
    pub location: Point,
    pub distance_meters: f64,
    pub convenience: Convenience,
}

/// 1.0 on exact destination equality, 0.8 when both sides name the same
/// known institution, 0.0 otherwise.
pub(super) fn university_match(requested: &str, candidate: &str) -> f64 {
    if requested == candidate {
        return 1.0;
    }
    match (extract_institution(requested), extract_institution(candidate)) {
        (Some(a), Some(b)) if a == b => 0.8,
        _ => 0.0,
    }
}

/// First known institution appearing in the destination, if any.
fn extract_institution(destination: &str) -> Option<&'static str> {
    let lowered = destination.to_lowercase();
    KNOWN_INSTITUTIONS
        .iter()
        .find(|token| lowered.contains(&token.to_lowercase()))
        .copied()
}

/// Linear falloff from 1.0 at identical departure times to 0.0 at the edge
/// of the window; 0.0 outside it.
pub(super) fn time_match(
    requested: DateTime<Utc>,
    candidate: DateTime<Utc>,
    window: Duration,
) -> f64 {
    let delta = (requested - candidate).abs();
    if delta > window {
        return 0.0;
    }
    1.0 - delta.num_milliseconds() as f64 / window.num_milliseconds() as f64
}

/// Full marks within walking range, linear falloff to the cutoff, zero past
/// it. An unresolved rider pickup scores neutral rather than failing.
pub(super) fn location_match(
    rider_pickup: Option<Point>,
    candidate_pickup: Point,
    max_distance_meters: f64,
) -> f64 {
    let Some(pickup) = rider_pickup else {
        return NEUTRAL_SCORE;
    };
    let d = distance_meters(pickup, candidate_pickup);
    if d <= FULL_SCORE_PICKUP_METERS {
        1.0
    } else if d <= max_distance_meters {
        1.0 - d / max_distance_meters
    } else {
        0.0
    }
}

/// Rating scaled to [0, 1]; drivers below the floor, and absent drivers,
/// score zero.
pub(super) fn rating_score(driver: Option<&User>, min_rating: f64) -> f64 {
    match driver {
        Some(driver) if driver.rating >= min_rating => driver.rating / 5.0,
        _ => 0.0,
    }
}

/// How close the rider pickup sits to the candidate's route, tiered by the
/// nearest route point. An unresolved pickup scores neutral.
pub(super) fn route_efficiency(rider_pickup: Option<Point>, route: &[Point]) -> f64 {
    let Some(pickup) = rider_pickup else {
        return NEUTRAL_SCORE;
    };
    let closest = route
        .iter()
        .map(|point| distance_meters(pickup, *point))
        .fold(f64::INFINITY, f64::min);
    if closest <= ON_ROUTE_METERS {
        1.0
    } else if closest <= NEAR_ROUTE_METERS {
        0.7
    } else {
        0.3
    }
}

/// Weighted sum of the criteria, rounded to two decimals.
pub(super) fn weighted_total(criteria: &CriterionScores, weights: &ScoreWeights) -> f64 {
    let total = criteria.university_match * weights.university
        + criteria.time_match * weights.time
        + criteria.location_match * weights.location
        + criteria.rating_score * weights.rating
        + criteria.route_efficiency * weights.route;
    round2(total)
}

/// Route points within the suggestion radius, nearest first. An unresolved
/// pickup yields no suggestions.
pub(super) fn pickup_suggestions(
    rider_pickup: Option<Point>,
    route: &[Point],
    radius_meters: f64,
) -> Vec<PickupSuggestion> {
    let Some(pickup) = rider_pickup else {
        return Vec::new();
    };
    let mut suggestions: Vec<PickupSuggestion> = route
        .iter()
        .filter_map(|point| {
            let d = distance_meters(pickup, *point);
            if d > radius_meters {
                return None;
            }
            Some(PickupSuggestion {
                location: *point,
                distance_meters: d.round(),
                convenience: convenience_for(d),
            })
        })
        .collect();
    suggestions.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    suggestions
}

fn convenience_for(distance_meters: f64) -> Convenience {
    if distance_meters <= HIGH_CONVENIENCE_METERS {
        Convenience::High
    } else if distance_meters <= MEDIUM_CONVENIENCE_METERS {
        Convenience::Medium
    } else {
        Convenience::Low
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
