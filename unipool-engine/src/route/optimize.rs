//! Greedy waypoint ordering.

use crate::domain::Point;
use crate::geo::distance_meters;

use super::RouteError;

/// Order waypoints for a multi-stop trip.
///
/// The first waypoint stays fixed; the rest are appended greedily, nearest
/// unvisited waypoint first, with ties going to the earlier input position.
/// This is an approximation and can miss the shortest tour, which is fine
/// for the handful of stops a carpool run has.
pub fn optimize(waypoints: &[Point]) -> Result<Vec<Point>, RouteError> {
    if waypoints.len() < 2 {
        return Err(RouteError::TooFewWaypoints(waypoints.len()));
    }
    if waypoints.len() == 2 {
        return Ok(waypoints.to_vec());
    }

    let mut current = waypoints[0];
    let mut ordered = vec![current];
    let mut remaining: Vec<Point> = waypoints[1..].to_vec();

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = distance_meters(current, remaining[0]);
        for (i, candidate) in remaining.iter().enumerate().skip(1) {
            let d = distance_meters(current, *candidate);
            if d < best_distance {
                best_distance = d;
                best = i;
            }
        }
        current = remaining.remove(best);
        ordered.push(current);
    }

    Ok(ordered)
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn arb_point() -> impl Strategy<Value = Point> {
        (31.0f64..32.0, 74.0f64..75.0).prop_map(|(lat, lng)| Point::new(lat, lng).unwrap())
    }

    fn bits(p: &Point) -> (u64, u64) {
        (p.lat().to_bits(), p.lng().to_bits())
    }

    proptest! {
        #[test]
        fn output_is_permutation_of_input(
            waypoints in prop::collection::vec(arb_point(), 2..8),
        ) {
            let ordered = optimize(&waypoints).unwrap();
            let mut expected: Vec<_> = waypoints.iter().map(bits).collect();
            let mut actual: Vec<_> = ordered.iter().map(bits).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn output_starts_at_first_waypoint(
            waypoints in prop::collection::vec(arb_point(), 2..8),
        ) {
            let ordered = optimize(&waypoints).unwrap();
            prop_assert_eq!(ordered[0], waypoints[0]);
        }
    }
}
