//! Itinerary assembly over the geocoding gateway.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::Point;
use crate::gateway::{GeoGateway, GeoProvider};
use crate::mapbox::DirectionsRoute;

use super::RouteError;

/// One driven leg between consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub from: Point,
    pub to: Point,
    pub route: Arc<DirectionsRoute>,
}

/// A fully resolved multi-stop trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub waypoints: Vec<Point>,
    pub legs: Vec<RouteLeg>,
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
}

/// Fetch directions for each consecutive waypoint pair and total them up.
///
/// Legs are fetched concurrently but reported in travel order. The first
/// failed leg fails the whole build; a partial itinerary is never returned.
pub async fn build_itinerary<P: GeoProvider>(
    gateway: &GeoGateway<P>,
    waypoints: &[Point],
) -> Result<Itinerary, RouteError> {
    if waypoints.len() < 2 {
        return Err(RouteError::TooFewWaypoints(waypoints.len()));
    }

    let fetched = join_all(
        waypoints
            .windows(2)
            .map(|pair| gateway.directions(pair[0], pair[1])),
    )
    .await;

    let mut legs = Vec::with_capacity(fetched.len());
    let mut total_distance_meters = 0.0;
    let mut total_duration_seconds = 0.0;
    for (leg, result) in fetched.into_iter().enumerate() {
        let route = result.map_err(|source| RouteError::Leg { leg, source })?;
        total_distance_meters += route.distance_meters;
        total_duration_seconds += route.duration_seconds;
        legs.push(RouteLeg {
            from: waypoints[leg],
            to: waypoints[leg + 1],
            route,
        });
    }

    Ok(Itinerary {
        waypoints: waypoints.to_vec(),
        legs,
        total_distance_meters,
        total_duration_seconds,
    })
}
