//! Engine tests over in-memory stores and a stubbed geo provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{
    Booking, BookingRecord, CandidateRide, Location, Place, Point, RideId, RiderRequest, User,
    UserId,
};
use crate::gateway::{GatewayConfig, GeoGateway, GeoProvider};
use crate::gazetteer::lahore_gazetteer;
use crate::mapbox::{DirectionsRoute, GeocodeCandidate, MapboxError, TravelMatrix};
use crate::store::{RideQuery, RideStore, StoreError, UserStore};

use super::{Convenience, MatchConfig, MatchEngine, MatchError, MatchQuality, ScoreWeights};

#[derive(Default)]
struct FakeRideStore {
    rides: Vec<CandidateRide>,
    bookings: HashMap<RideId, Vec<Booking>>,
    fail_find: bool,
}

impl RideStore for FakeRideStore {
    async fn find_available(&self, _query: &RideQuery) -> Result<Vec<CandidateRide>, StoreError> {
        if self.fail_find {
            return Err(StoreError::Backend {
                message: "connection reset".to_string(),
            });
        }
        Ok(self.rides.clone())
    }

    async fn bookings_for_ride(&self, ride: RideId) -> Result<Vec<Booking>, StoreError> {
        Ok(self.bookings.get(&ride).cloned().unwrap_or_default())
    }

    async fn find_by_route(
        &self,
        _pickup: &str,
        _destination: &str,
        _seats: u32,
    ) -> Result<Vec<CandidateRide>, StoreError> {
        Ok(Vec::new())
    }

    async fn booking_history(&self, _user: UserId) -> Result<Vec<BookingRecord>, StoreError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct FakeUserStore {
    users: HashMap<UserId, User>,
}

impl UserStore for FakeUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).cloned())
    }
}

#[derive(Default)]
struct StubGeo {
    geocode_results: Vec<GeocodeCandidate>,
    geocode_calls: Arc<Mutex<usize>>,
}

impl GeoProvider for StubGeo {
    async fn geocode(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, MapboxError> {
        *self.geocode_calls.lock().unwrap() += 1;
        Ok(self.geocode_results.clone())
    }

    async fn reverse_geocode(&self, _point: Point) -> Result<Option<GeocodeCandidate>, MapboxError> {
        Ok(None)
    }

    async fn directions(
        &self,
        _origin: Point,
        _destination: Point,
    ) -> Result<DirectionsRoute, MapboxError> {
        Err(MapboxError::NoRoute)
    }

    async fn matrix(&self, _points: &[Point]) -> Result<TravelMatrix, MapboxError> {
        Err(MapboxError::NoRoute)
    }
}

fn fcc() -> Point {
    Point::new(31.522381, 74.331627).unwrap()
}

fn rider_point() -> Point {
    Point::new(31.52, 74.35).unwrap()
}

fn departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 30, 0).unwrap()
}

fn campus_ride(id: u64, driver: u64) -> CandidateRide {
    CandidateRide {
        id: RideId(id),
        driver: UserId(driver),
        pickup: rider_point(),
        destination: Place::new("Forman Christian College", fcc()),
        departure: departure(),
        route: Vec::new(),
        seats_total: 4,
        seats_booked: 0,
    }
}

fn driver(id: u64, rating: f64) -> User {
    User {
        id: UserId(id),
        name: format!("Driver {id}"),
        rating,
        total_rides: 12,
        profile: None,
    }
}

fn coordinate_request() -> RiderRequest {
    RiderRequest {
        pickup: Location::Coordinate(rider_point()),
        destination: "Forman Christian College".to_string(),
        departure: departure(),
        seats: 1,
    }
}

fn engine_with(
    rides: FakeRideStore,
    users: Vec<User>,
    geo: StubGeo,
    config: MatchConfig,
) -> MatchEngine<FakeRideStore, FakeUserStore, StubGeo> {
    let users = FakeUserStore {
        users: users.into_iter().map(|u| (u.id, u)).collect(),
    };
    let gateway = GeoGateway::new(geo, lahore_gazetteer(), GatewayConfig::default());
    MatchEngine::new(
        Arc::new(rides),
        Arc::new(users),
        Arc::new(gateway),
        config,
    )
}

fn store_with(rides: Vec<CandidateRide>) -> FakeRideStore {
    FakeRideStore {
        rides,
        ..FakeRideStore::default()
    }
}

#[tokio::test]
async fn identical_ride_scores_ninety_nine() {
    let engine = engine_with(
        store_with(vec![campus_ride(1, 10)]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    assert_eq!(report.total_found, 1);
    assert_eq!(report.matches.len(), 1);
    assert!(report.message.is_none());

    let top = &report.matches[0];
    assert_eq!(top.score.criteria.university_match, 1.0);
    assert_eq!(top.score.criteria.time_match, 1.0);
    assert_eq!(top.score.criteria.location_match, 1.0);
    assert_eq!(top.score.criteria.rating_score, 0.96);
    assert_eq!(top.score.criteria.route_efficiency, 1.0);
    assert_eq!(top.score.total, 0.99);
    assert_eq!(top.quality, MatchQuality::Excellent);
    assert_eq!(top.driver.as_ref().map(|d| d.name.as_str()), Some("Driver 10"));
    assert_eq!(top.seats_booked, 0);
    assert_eq!(top.seats_available, 4);
}

#[tokio::test]
async fn validation_checks_fields_in_order() {
    let mut request = coordinate_request();
    request.pickup = Location::Address("   ".to_string());
    request.destination = "  ".to_string();
    request.seats = 0;

    // Pickup is reported first even though later fields are also invalid.
    assert!(matches!(
        request.validate(),
        Err(MatchError::InvalidRequest { field: "pickup" })
    ));

    request.pickup = Location::Coordinate(rider_point());
    assert!(matches!(
        request.validate(),
        Err(MatchError::InvalidRequest { field: "destination" })
    ));

    request.destination = "Forman Christian College".to_string();
    assert!(matches!(
        request.validate(),
        Err(MatchError::InvalidRequest { field: "seats" })
    ));

    request.seats = 1;
    assert!(request.validate().is_ok());
}

#[tokio::test]
async fn invalid_request_fails_find_matches() {
    let engine = engine_with(
        store_with(Vec::new()),
        Vec::new(),
        StubGeo::default(),
        MatchConfig::default(),
    );
    let mut request = coordinate_request();
    request.seats = 0;

    let err = engine.find_matches(&request).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::InvalidRequest { field: "seats" }
    ));
}

#[tokio::test]
async fn empty_store_yields_message_not_error() {
    let engine = engine_with(
        store_with(Vec::new()),
        Vec::new(),
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    assert!(report.matches.is_empty());
    assert_eq!(report.total_found, 0);
    assert_eq!(
        report.message.as_deref(),
        Some("No rides found matching your criteria. Try adjusting your search.")
    );
    assert_eq!(report.criteria.destination, "Forman Christian College");
    assert_eq!(report.criteria.seats, 1);
}

#[tokio::test]
async fn matches_ranked_by_total_then_ride_id() {
    let engine = engine_with(
        store_with(vec![
            campus_ride(1, 31),
            campus_ride(3, 30),
            campus_ride(2, 32),
        ]),
        vec![driver(30, 5.0), driver(31, 4.8), driver(32, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let ids: Vec<u64> = report.matches.iter().map(|m| m.ride.id.0).collect();
    let totals: Vec<f64> = report.matches.iter().map(|m| m.score.total).collect();
    // Ride 3 wins on its 5.0-rated driver; the 0.99 tie resolves to the
    // lower ride id.
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(totals, vec![1.0, 0.99, 0.99]);
}

#[tokio::test]
async fn zero_scoring_candidates_are_dropped() {
    // Zero the route weight so a candidate can actually reach a zero total.
    let config = MatchConfig {
        weights: ScoreWeights {
            university: 0.3,
            time: 0.3,
            location: 0.2,
            rating: 0.2,
            route: 0.0,
        },
        ..MatchConfig::default()
    };
    let mut hopeless = campus_ride(1, 10);
    hopeless.destination = Place::new("Daewoo Terminal", Point::new(31.57, 74.35).unwrap());
    hopeless.pickup = Point::new(31.57, 74.35).unwrap(); // 5560 m away
    hopeless.departure = departure() + Duration::minutes(45);

    let engine = engine_with(
        store_with(vec![hopeless]),
        vec![driver(10, 3.0)],
        StubGeo::default(),
        config,
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    assert!(report.matches.is_empty());
    assert_eq!(report.total_found, 0);
    // The store had candidates, so there is no "nothing found" message.
    assert!(report.message.is_none());
}

#[tokio::test]
async fn forty_five_minute_offset_zeroes_the_time_criterion() {
    let mut late = campus_ride(1, 10);
    late.departure = departure() + Duration::minutes(45);
    let engine = engine_with(
        store_with(vec![late]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let top = &report.matches[0];
    assert_eq!(top.score.criteria.time_match, 0.0);
    assert_eq!(top.score.total, 0.74);
    assert_eq!(top.quality, MatchQuality::Good);
}

#[tokio::test]
async fn fifteen_minute_offset_scores_half_time() {
    let mut soon = campus_ride(1, 10);
    soon.departure = departure() + Duration::minutes(15);
    let engine = engine_with(
        store_with(vec![soon]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let top = &report.matches[0];
    assert_eq!(top.score.criteria.time_match, 0.5);
    assert_eq!(top.score.total, 0.87);
}

#[tokio::test]
async fn truncates_matches_but_reports_full_count() {
    let config = MatchConfig {
        max_results: 2,
        ..MatchConfig::default()
    };
    let engine = engine_with(
        store_with(vec![
            campus_ride(3, 10),
            campus_ride(1, 10),
            campus_ride(2, 10),
        ]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        config,
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    assert_eq!(report.total_found, 3);
    let ids: Vec<u64> = report.matches.iter().map(|m| m.ride.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn address_pickup_resolves_once_through_the_gateway() {
    let geo = StubGeo {
        geocode_results: vec![GeocodeCandidate {
            name: "FCC Underpass, Lahore, Pakistan".to_string(),
            point: rider_point(),
            kind: "poi".to_string(),
            relevance: 1.0,
            is_fallback: false,
        }],
        ..StubGeo::default()
    };
    let geocode_calls = Arc::clone(&geo.geocode_calls);
    let engine = engine_with(
        store_with(vec![campus_ride(1, 10), campus_ride(2, 11)]),
        vec![driver(10, 4.8), driver(11, 4.8)],
        geo,
        MatchConfig::default(),
    );
    let mut request = coordinate_request();
    request.pickup = Location::Address("FCC Underpass".to_string());

    let report = engine.find_matches(&request).await.unwrap();

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].score.criteria.location_match, 1.0);
    // One geocode for the request, not one per candidate.
    assert_eq!(*geocode_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn unresolvable_pickup_scores_neutral_distances() {
    let engine = engine_with(
        store_with(vec![campus_ride(1, 10)]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );
    let mut request = coordinate_request();
    // Misses both the stub provider and the gazetteer.
    request.pickup = Location::Address("Narnia House".to_string());

    let report = engine.find_matches(&request).await.unwrap();

    let top = &report.matches[0];
    assert_eq!(top.score.criteria.location_match, 0.5);
    assert_eq!(top.score.criteria.route_efficiency, 0.5);
    assert_eq!(top.score.total, 0.84);
    assert!(top.pickup_suggestions.is_empty());
}

#[tokio::test]
async fn missing_driver_zeroes_the_rating() {
    let engine = engine_with(
        store_with(vec![campus_ride(1, 10)]),
        Vec::new(),
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let top = &report.matches[0];
    assert_eq!(top.score.criteria.rating_score, 0.0);
    assert_eq!(top.score.total, 0.85);
    assert!(top.driver.is_none());
}

#[tokio::test]
async fn enrichment_counts_bookings_not_seats() {
    let mut store = store_with(vec![campus_ride(1, 10)]);
    store.bookings.insert(
        RideId(1),
        vec![
            Booking {
                passenger: UserId(21),
                seats: 2,
            },
            Booking {
                passenger: UserId(22),
                seats: 1,
            },
        ],
    );
    let engine = engine_with(
        store,
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let top = &report.matches[0];
    assert_eq!(top.seats_booked, 2);
    assert_eq!(top.seats_available, 2);
}

#[tokio::test]
async fn route_points_near_the_rider_become_suggestions() {
    let mut ride = campus_ride(1, 10);
    ride.route = vec![
        Point::new(31.538, 74.35).unwrap(), // 2000 m
        Point::new(31.522, 74.35).unwrap(), // 220 m
        Point::new(31.57, 74.35).unwrap(),  // 5560 m, outside the radius
    ];
    let engine = engine_with(
        store_with(vec![ride]),
        vec![driver(10, 4.8)],
        StubGeo::default(),
        MatchConfig::default(),
    );

    let report = engine.find_matches(&coordinate_request()).await.unwrap();

    let suggestions = &report.matches[0].pickup_suggestions;
    let distances: Vec<f64> = suggestions.iter().map(|s| s.distance_meters).collect();
    assert_eq!(distances, vec![220.0, 2000.0]);
    assert_eq!(suggestions[0].convenience, Convenience::High);
    assert_eq!(suggestions[1].convenience, Convenience::Low);
}

#[tokio::test]
async fn store_failure_propagates() {
    let store = FakeRideStore {
        fail_find: true,
        ..FakeRideStore::default()
    };
    let engine = engine_with(
        store,
        Vec::new(),
        StubGeo::default(),
        MatchConfig::default(),
    );

    let err = engine.find_matches(&coordinate_request()).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::Store(StoreError::Backend { .. })
    ));
}
