//! Ride recommendations from booking history.
//!
//! Booking records are tallied into travel patterns (where the user leaves
//! from, where they go, and when), and the most frequent pickup/destination
//! pairs are replayed against the ride store.

mod patterns;
mod recommender;

pub use patterns::{FrequencyMap, TravelPatterns, analyze_patterns};
pub use recommender::{RecommendContext, Recommendations, Recommender};
