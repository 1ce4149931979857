use chrono::{DateTime, Utc};

use super::ids::{RideId, UserId};
use super::location::{Location, Place};
use super::point::Point;

/// A rider's search request. Immutable once scored.
#[derive(Debug, Clone)]
pub struct RiderRequest {
    /// Where the rider wants to be picked up.
    pub pickup: Location,
    /// Free-text destination, e.g. "Forman Christian College".
    pub destination: String,
    /// Desired departure time.
    pub departure: DateTime<Utc>,
    /// Seats requested, must be at least 1.
    pub seats: u32,
}

/// A ride offer returned by the ride store as a possible match, prior to
/// scoring. Read-only to the engine.
#[derive(Debug, Clone)]
pub struct CandidateRide {
    pub id: RideId,
    pub driver: UserId,
    pub pickup: Point,
    pub destination: Place,
    pub departure: DateTime<Utc>,
    /// Ordered route waypoints. May be empty, in which case the route is
    /// treated as the straight pickup-to-destination pair.
    pub route: Vec<Point>,
    pub seats_total: u32,
    pub seats_booked: u32,
}

impl CandidateRide {
    /// The effective route geometry: the stored waypoints, or the
    /// pickup/destination pair when no detailed route was supplied.
    pub fn route_points(&self) -> Vec<Point> {
        if self.route.is_empty() {
            vec![self.pickup, self.destination.point]
        } else {
            self.route.clone()
        }
    }
}

/// A confirmed booking on a ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub passenger: UserId,
    pub seats: u32,
}

/// One entry of a rider's booking history, flattened to the fields the
/// pattern recommender consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub pickup: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(lat: f64, lng: f64) -> Point {
        Point::new(lat, lng).unwrap()
    }

    fn ride_with_route(route: Vec<Point>) -> CandidateRide {
        CandidateRide {
            id: RideId(1),
            driver: UserId(9),
            pickup: point(31.4662, 74.3436),
            destination: Place::new("FCC University", point(31.522381, 74.331627)),
            departure: Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap(),
            route,
            seats_total: 4,
            seats_booked: 1,
        }
    }

    #[test]
    fn route_points_uses_stored_waypoints() {
        let route = vec![point(31.47, 74.34), point(31.50, 74.33)];
        let ride = ride_with_route(route.clone());
        assert_eq!(ride.route_points(), route);
    }

    #[test]
    fn empty_route_falls_back_to_endpoints() {
        let ride = ride_with_route(vec![]);
        assert_eq!(
            ride.route_points(),
            vec![ride.pickup, ride.destination.point]
        );
    }
}
