//! Ride recommendations from a user's travel patterns.

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::domain::{CandidateRide, UserId};
use crate::store::{RideStore, StoreError, UserStore};

use super::patterns::{TravelPatterns, analyze_patterns};

/// How many top pickups and destinations get crossed into store queries.
const TOP_PATTERNS: usize = 3;

/// Cap on recommended rides.
const MAX_RECOMMENDATIONS: usize = 10;

/// Optional knobs for a recommendation request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendContext {
    /// Seats to search with; defaults to 1.
    pub seats_requested: Option<u32>,
}

/// Recommended rides plus the patterns that produced them.
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub rides: Vec<CandidateRide>,
    pub patterns: TravelPatterns,
    pub seats_requested: u32,
}

/// Recommends rides by replaying a user's most frequent routes.
pub struct Recommender<R, U> {
    rides: Arc<R>,
    users: Arc<U>,
}

impl<R, U> Recommender<R, U>
where
    R: RideStore,
    U: UserStore,
{
    pub fn new(rides: Arc<R>, users: Arc<U>) -> Self {
        Self { rides, users }
    }

    /// Recommend rides for a user based on their booking history.
    ///
    /// The user's top pickups and destinations are crossed and each pair is
    /// queried concurrently; results concatenate in pair order and the list
    /// is capped. A user with no history gets an empty list, not an error.
    pub async fn recommend(
        &self,
        user: UserId,
        context: RecommendContext,
    ) -> Result<Recommendations, StoreError> {
        if self.users.find_by_id(user).await?.is_none() {
            return Err(StoreError::UserNotFound { id: user });
        }

        let history = self.rides.booking_history(user).await?;
        let patterns = analyze_patterns(&history);
        let seats_requested = context.seats_requested.unwrap_or(1);

        let top_pickups = patterns.pickups.top(TOP_PATTERNS);
        let top_destinations = patterns.destinations.top(TOP_PATTERNS);

        let mut queries = Vec::with_capacity(top_pickups.len() * top_destinations.len());
        for pickup in &top_pickups {
            for destination in &top_destinations {
                queries.push(self.rides.find_by_route(
                    pickup.as_str(),
                    destination.as_str(),
                    seats_requested,
                ));
            }
        }
        debug!(%user, pairs = queries.len(), "querying route cross-product");

        let mut rides = Vec::new();
        for result in join_all(queries).await {
            rides.extend(result?);
        }
        rides.truncate(MAX_RECOMMENDATIONS);

        Ok(Recommendations {
            rides,
            patterns,
            seats_requested,
        })
    }
}
