//! The match engine: validate, score, rank, and enrich candidate rides.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{CandidateRide, Location, Point, RiderRequest, User};
use crate::gateway::{GeoGateway, GeoProvider};
use crate::store::{RideQuery, RideStore, StoreError, UserStore};

use super::config::MatchConfig;
use super::score::{self, CriterionScores, MatchQuality, MatchScore, PickupSuggestion};

/// Attached to an empty report when the store had no candidates at all.
const NO_MATCHES_MESSAGE: &str =
    "No rides found matching your criteria. Try adjusting your search.";

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A request field failed validation.
    #[error("invalid ride request: {field}")]
    InvalidRequest { field: &'static str },
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// One scored, enriched candidate.
#[derive(Debug, Clone)]
pub struct RideMatch {
    pub ride: CandidateRide,
    pub score: MatchScore,
    pub quality: MatchQuality,
    pub pickup_suggestions: Vec<PickupSuggestion>,
    /// Driver summary; absent when the user store has no such driver.
    pub driver: Option<User>,
    /// Live booking count for the ride.
    pub seats_booked: u32,
    /// Capacity minus live bookings.
    pub seats_available: u32,
}

/// The outcome of a match request.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Matches in rank order, capped at the configured maximum.
    pub matches: Vec<RideMatch>,
    /// Survivor count before the cap was applied.
    pub total_found: usize,
    /// Echo of the store query this report answers.
    pub criteria: RideQuery,
    /// Set when the store had no candidates for the criteria.
    pub message: Option<String>,
}

impl RiderRequest {
    /// Check request fields in order; the first violation wins.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.pickup.is_empty() {
            return Err(MatchError::InvalidRequest { field: "pickup" });
        }
        if self.destination.trim().is_empty() {
            return Err(MatchError::InvalidRequest { field: "destination" });
        }
        if self.seats < 1 {
            return Err(MatchError::InvalidRequest { field: "seats" });
        }
        Ok(())
    }
}

/// Scores candidate rides against a rider request and ranks the survivors.
pub struct MatchEngine<R, U, P> {
    rides: Arc<R>,
    users: Arc<U>,
    gateway: Arc<GeoGateway<P>>,
    config: MatchConfig,
}

impl<R, U, P> MatchEngine<R, U, P>
where
    R: RideStore,
    U: UserStore,
    P: GeoProvider,
{
    pub fn new(
        rides: Arc<R>,
        users: Arc<U>,
        gateway: Arc<GeoGateway<P>>,
        config: MatchConfig,
    ) -> Self {
        Self {
            rides,
            users,
            gateway,
            config,
        }
    }

    /// Find, score, and rank rides for a request.
    ///
    /// An empty store result is not an error: it produces an empty report
    /// with an explanatory message. Candidates are scored concurrently, kept
    /// only when their total is positive, sorted by descending total with
    /// ties going to the lower ride id, capped, and then enriched with the
    /// driver summary and live seat counts.
    pub async fn find_matches(&self, request: &RiderRequest) -> Result<MatchReport, MatchError> {
        request.validate()?;

        let query = RideQuery {
            destination: request.destination.clone(),
            departure: request.departure,
            seats: request.seats,
        };
        let candidates = self.rides.find_available(&query).await?;
        if candidates.is_empty() {
            debug!(destination = %query.destination, "no candidate rides in store");
            return Ok(MatchReport {
                matches: Vec::new(),
                total_found: 0,
                criteria: query,
                message: Some(NO_MATCHES_MESSAGE.to_string()),
            });
        }

        let rider_pickup = self.resolve_pickup(&request.pickup).await;

        let scored = join_all(candidates.into_iter().map(|candidate| async move {
            let driver = self.users.find_by_id(candidate.driver).await?;
            let score = self.score_candidate(request, &candidate, driver.as_ref(), rider_pickup);
            Ok::<_, StoreError>((candidate, driver, score))
        }))
        .await;

        let mut survivors = Vec::with_capacity(scored.len());
        for result in scored {
            let (candidate, driver, score) = result?;
            if score.total > 0.0 {
                survivors.push((candidate, driver, score));
            }
        }

        survivors.sort_by(|a, b| {
            b.2.total
                .total_cmp(&a.2.total)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        let total_found = survivors.len();
        survivors.truncate(self.config.max_results);

        let matches = join_all(
            survivors
                .into_iter()
                .map(|(candidate, driver, score)| self.enrich(candidate, driver, score, rider_pickup)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(MatchReport {
            matches,
            total_found,
            criteria: query,
            message: None,
        })
    }

    /// Resolve the rider pickup to a coordinate, once per request.
    ///
    /// Coordinates pass through; addresses geocode through the gateway. Any
    /// failure degrades to `None`, which scores the distance criteria
    /// neutrally instead of failing the whole request.
    async fn resolve_pickup(&self, pickup: &Location) -> Option<Point> {
        match pickup {
            Location::Coordinate(point) => Some(*point),
            Location::Address(address) => match self.gateway.geocode(address).await {
                Ok(candidates) => candidates.first().map(|c| c.point),
                Err(e) => {
                    warn!(%address, error = %e, "rider pickup did not resolve");
                    None
                }
            },
        }
    }

    fn score_candidate(
        &self,
        request: &RiderRequest,
        candidate: &CandidateRide,
        driver: Option<&User>,
        rider_pickup: Option<Point>,
    ) -> MatchScore {
        let route = candidate.route_points();
        let criteria = CriterionScores {
            university_match: score::university_match(
                &request.destination,
                &candidate.destination.label,
            ),
            time_match: score::time_match(
                request.departure,
                candidate.departure,
                self.config.time_window(),
            ),
            location_match: score::location_match(
                rider_pickup,
                candidate.pickup,
                self.config.max_pickup_distance_meters,
            ),
            rating_score: score::rating_score(driver, self.config.min_driver_rating),
            route_efficiency: score::route_efficiency(rider_pickup, &route),
        };
        MatchScore {
            total: score::weighted_total(&criteria, &self.config.weights),
            criteria,
        }
    }

    async fn enrich(
        &self,
        candidate: CandidateRide,
        driver: Option<User>,
        score: MatchScore,
        rider_pickup: Option<Point>,
    ) -> Result<RideMatch, StoreError> {
        let bookings = self.rides.bookings_for_ride(candidate.id).await?;
        let seats_booked = bookings.len() as u32;
        let seats_available = candidate.seats_total.saturating_sub(seats_booked);
        let pickup_suggestions = score::pickup_suggestions(
            rider_pickup,
            &candidate.route_points(),
            self.config.suggestion_radius_meters,
        );
        Ok(RideMatch {
            quality: MatchQuality::from_total(score.total),
            ride: candidate,
            score,
            pickup_suggestions,
            driver,
            seats_booked,
            seats_available,
        })
    }
}
